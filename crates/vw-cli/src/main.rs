use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vw_core::{ManagerConfig, Service, VlanBinding};
use vw_ifcfg::{NetworkScripts, render_bridge, render_vlan};
use vw_manager::VlanManager;

#[derive(Parser)]
#[command(name = "vlanwarden")]
#[command(version, about = "VLAN and bridge interface lifecycle", long_about = None)]
struct Cli {
    /// Configuration file (defaults to /etc/vlanwarden/config.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct VlanArgs {
    /// VLAN tag (1-4094)
    #[arg(short, long, allow_negative_numbers = true)]
    tag: i32,
    /// Parent interface to tag, e.g. eth0
    #[arg(short, long)]
    interface: String,
    /// Bridge interface the VLAN is attached to
    #[arg(short, long)]
    bridge: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the bridge and VLAN sub-interface
    Create(VlanArgs),
    /// Delete the bridge and VLAN sub-interface
    Delete(VlanArgs),
    /// Show whether the interfaces and their configuration files exist
    Status {
        #[command(flatten)]
        vlan: VlanArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the required tools are installed
    Check,
    /// Print the configuration files that create would write
    Render(VlanArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ManagerConfig::load(cli.config.as_deref())?;
    tracing::debug!(config = ?config, "Loaded configuration");

    tokio::runtime::Runtime::new()?.block_on(async { run(cli.command, &config).await })
}

async fn run(command: Commands, config: &ManagerConfig) -> anyhow::Result<()> {
    let manager = VlanManager::new(config)?;

    match command {
        Commands::Create(args) => {
            manager.start().await?;
            manager
                .create_vlan(args.tag, &args.interface, &args.bridge)
                .await?;
            println!(
                "✅ VLAN {} on {} attached to {}",
                args.tag, args.interface, args.bridge
            );
        }
        Commands::Delete(args) => {
            manager.start().await?;
            manager
                .delete_vlan(args.tag, &args.interface, &args.bridge)
                .await?;
            println!(
                "✅ VLAN {} on {} and bridge {} removed",
                args.tag, args.interface, args.bridge
            );
        }
        Commands::Status { vlan, json } => {
            let status = manager
                .status(vlan.tag, &vlan.interface, &vlan.bridge)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                status.display();
            }
        }
        Commands::Check => {
            manager.check_vlan_configuration().await?;
            println!(
                "✅ Required commands available: {}, {}",
                config.ifconfig, config.brctl
            );
        }
        Commands::Render(args) => render_files(config, &args)?,
    }

    Ok(())
}

fn render_files(config: &ManagerConfig, args: &VlanArgs) -> anyhow::Result<()> {
    let binding = VlanBinding::new(args.tag, &args.interface, &args.bridge)?;
    let scripts = NetworkScripts::new(&config.network_scripts_dir);

    println!("# {}", scripts.path(&binding.bridge_filename()).display());
    print!(
        "{}",
        render_bridge(
            &binding.bridge_interface,
            &binding.vlan_interface,
            binding.tag,
            true
        )
    );
    println!();
    println!("# {}", scripts.path(&binding.vlan_filename()).display());
    print!("{}", render_vlan(&binding.vlan_interface, binding.tag));

    Ok(())
}
