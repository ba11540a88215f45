use std::{sync::Arc, time::Duration};

use {
    anyhow::Result,
    chainchat_agents::HttpAgentClient,
    chainchat_bridge::{BridgeContext, FixedBackoff, Supervisor},
    chainchat_config::{ChainchatConfig, validate},
    tokio::io::BufReader,
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
};

use crate::{config_commands::print_diagnostics, console::ConsoleClient};

pub async fn handle_run(config: ChainchatConfig, stdio: bool) -> Result<()> {
    if !stdio {
        anyhow::bail!(
            "no messaging network client is linked into this binary; use `chainchat run --stdio`"
        );
    }

    let validation = validate(&config);
    print_diagnostics(&validation);
    if validation.has_errors() {
        anyhow::bail!("refusing to start with an invalid configuration");
    }

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                shutdown.cancel();
            },
            Err(e) => warn!(error = %e, "failed to listen for ctrl-c"),
        }
    });

    let client = ConsoleClient::spawn(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        config.identity.clone(),
        cancel.clone(),
    );
    let agent = Arc::new(HttpAgentClient::new(&config.agent)?);
    let ctx = BridgeContext::new(&config, client, agent).with_cancel(cancel);

    let supervisor = Supervisor::new(
        Arc::new(ctx),
        Box::new(FixedBackoff::new(Duration::from_secs(
            config.supervisor.retry_delay_secs,
        ))),
        config.supervisor.max_retries,
    );

    supervisor.run().await?;
    info!("bridge stopped");
    Ok(())
}
