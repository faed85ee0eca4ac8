//! snmp-agentd: SNMPv1 agent serving the MIB-II system group.

use std::process::ExitCode;

use clap::Parser;
use snmp_agent::Agent;
use snmp_agent::cli::args::Args;
use snmp_agent::cli::hints;
use snmp_agent::cli::system::SystemGroup;
use snmp_agent::transport::UdpAgentTransport;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.output.init_tracing();

    let system = match SystemGroup::from_args(&args.system) {
        Ok(system) => system,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let builder = Agent::builder()
        .communities(
            args.agent.read_community.clone(),
            args.agent.write_community.clone(),
        )
        .max_message_size(args.agent.max_message_size);
    let agent = match system.register(builder).build() {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for object in agent.registry().iter() {
        tracing::debug!(
            snmp.oid = %object.oid(),
            name = hints::lookup(object.oid()).unwrap_or("-"),
            writable = object.is_writable(),
            "serving"
        );
    }

    let mut transport = UdpAgentTransport::builder().bind(args.agent.bind.clone());
    if let Some(size) = args.agent.recv_buffer_size {
        transport = transport.recv_buffer_size(size);
    }
    let transport = match transport.build().await {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("interrupt received");
                shutdown.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "cannot listen for interrupt"),
        }
    });

    match agent.serve(&transport, cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "agent stopped");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
