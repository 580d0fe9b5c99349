//! acte-signing - finish and sign a civil-registry act update

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use acte_signing::{
    api::RegistryApiClient,
    auth::Actor,
    config::Args,
    eligibility::{Act, Eligibility, Mention, PrecomputedEligibility, SigningInputs},
    logging::{self, AuditLogger, SigningEvent, SigningEventKind},
    notify::TracingNotifier,
    signing::{DualDigitalSigner, FileCertificates},
    workflow::{ControlState, EditSession, SigningWorkflow, StartOutcome, WorkflowState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init_tracing(&args.log_level, args.log_json);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(2);
    }

    info!(
        "acte-signing {} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT_SHORT"),
        env!("BUILD_TIMESTAMP")
    );

    let audit = AuditLogger::new();
    if let Some(ref path) = args.audit_log {
        audit.init_file(path.clone()).await?;
    }

    let interaction = &args.interaction;
    let actor = Actor::new(interaction.actor_id.clone(), args.claims().map_err(anyhow::Error::msg)?);
    let act = Act::new(
        interaction.act_id,
        interaction.act_electronic,
        interaction.act_integration_eligible,
    );
    let mentions: Vec<Mention> = (0..interaction.mentions)
        .map(|_| Mention::draft("MANUAL"))
        .collect();

    let eligibility = Eligibility::evaluate(
        &SigningInputs {
            actor: &actor,
            mentions: &mentions,
            eligible_flag: interaction.eligible,
            act: Some(&act),
        },
        &PrecomputedEligibility,
    );

    let mut session = EditSession::new(interaction.act_id, interaction.request_id);
    session.update_performed = interaction.update_performed;
    session.mention_entry_in_progress = interaction.mention_entry_in_progress;
    for mention in mentions {
        session.add_mention(mention);
    }

    let mut workflow = SigningWorkflow::new(session, TracingNotifier, eligibility);

    info!(
        actor = %actor.id,
        may_sign = eligibility.may_sign,
        mode = %eligibility.mode,
        may_proceed = eligibility.may_proceed,
        control = ?workflow.control_state(),
        "Signing eligibility"
    );

    if !interaction.sign {
        return Ok(());
    }

    let control = workflow.control_state();
    if control != ControlState::Enabled {
        warn!(
            control = ?control,
            mention_entry_in_progress = interaction.mention_entry_in_progress,
            update_performed = interaction.update_performed,
            may_proceed = eligibility.may_proceed,
            "Finish-and-sign control is not enabled"
        );
        std::process::exit(1);
    }

    let (Some(issuer), Some(entity)) = (
        interaction.issuer_certificate.clone(),
        interaction.entity_certificate.clone(),
    ) else {
        anyhow::bail!("certificates are required to sign");
    };

    let client = RegistryApiClient::new(args.api_client_config())?;
    let mut signer = DualDigitalSigner::new(
        Arc::new(client),
        Arc::new(FileCertificates::new(issuer, entity)),
    );
    if let Some(window) = args.blackout_window().map_err(anyhow::Error::msg)? {
        signer = signer.with_blackout(window);
    }

    let event = |kind| {
        SigningEvent::new(kind, &actor.id, interaction.act_id, interaction.request_id)
            .with_mode(eligibility.mode)
    };

    let request = match workflow.start() {
        StartOutcome::Confirming(request) => request,
        StartOutcome::Rejected => {
            audit.log(event(SigningEventKind::Rejected)).await;
            std::process::exit(1);
        }
        other => {
            warn!(outcome = ?other, "Signing not started");
            std::process::exit(1);
        }
    };
    audit.log(event(SigningEventKind::Started)).await;

    let state = workflow.confirm(&signer).await;
    match state {
        WorkflowState::Completed => {
            audit.log(event(SigningEventKind::Signed)).await;
            info!(
                act_id = %request.act_id,
                tab = %workflow.session().active_tab(),
                "Signing completed"
            );
            Ok(())
        }
        _ => {
            audit.log(event(SigningEventKind::Failed)).await;
            error!(act_id = %request.act_id, "Signing did not complete");
            std::process::exit(1);
        }
    }
}
