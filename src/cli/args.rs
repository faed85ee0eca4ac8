//! Command-line arguments for `snmp-agentd`.

use clap::Parser;

use crate::agent::DEFAULT_MAX_MESSAGE_SIZE;

/// SNMPv1 agent serving the MIB-II system group.
#[derive(Debug, Parser)]
#[command(name = "snmp-agentd", version, about)]
pub struct Args {
    #[command(flatten)]
    pub agent: AgentArgs,

    #[command(flatten)]
    pub system: SystemArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Listener and access control.
#[derive(Debug, clap::Args)]
pub struct AgentArgs {
    /// Address to listen on. Use [::]:161 for dual-stack.
    #[arg(short = 'b', long, default_value = "0.0.0.0:161")]
    pub bind: String,

    /// Community granting read access.
    #[arg(short = 'r', long, default_value = "public")]
    pub read_community: String,

    /// Community granting read and write access.
    #[arg(short = 'w', long, default_value = "private")]
    pub write_community: String,

    /// Kernel receive buffer size in bytes.
    #[arg(long)]
    pub recv_buffer_size: Option<usize>,

    /// Largest request or response accepted, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    pub max_message_size: usize,
}

/// Initial values for the system group.
#[derive(Debug, clap::Args)]
pub struct SystemArgs {
    /// sysDescr.0 (read-only).
    #[arg(long, default_value = concat!("snmp-agentd ", env!("CARGO_PKG_VERSION")))]
    pub sys_descr: String,

    /// sysObjectID.0 (read-only), dotted or a well-known name.
    #[arg(long, default_value = "1.3.6.1.4.1.8072.3.2.10")]
    pub sys_object_id: String,

    /// Initial sysContact.0.
    #[arg(long, default_value = "")]
    pub sys_contact: String,

    /// Initial sysName.0. Defaults to empty.
    #[arg(long, default_value = "")]
    pub sys_name: String,

    /// Initial sysLocation.0.
    #[arg(long, default_value = "")]
    pub sys_location: String,
}

/// Logging verbosity.
#[derive(Debug, clap::Args)]
pub struct OutputArgs {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl OutputArgs {
    /// Default filter directive for the chosen verbosity.
    pub fn filter_directive(&self) -> &'static str {
        if self.quiet {
            return "snmp_agent=error";
        }
        match self.verbose {
            0 => "snmp_agent=info",
            1 => "snmp_agent=debug",
            _ => "snmp_agent=trace",
        }
    }

    /// Install a stderr `tracing` subscriber.
    ///
    /// `RUST_LOG` takes precedence over the flags when set.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.filter_directive()));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
