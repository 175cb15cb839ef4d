mod report;

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use groupfund_core::{
    DepositClient, DepositConfig, DeploymentRecord, JsonFileCredentialStore, ReconciliationPolicy,
    repair_credentials,
};
use groupfund_transact::Address;

#[derive(Parser, Debug)]
#[command(author, version, about = "Deposit into a group-funding application", long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Wallet file holding the secret phrase
    #[arg(long, global = true, default_value = "permanent_wallet.json")]
    wallet: PathBuf,

    /// Deployment file holding the application id
    #[arg(long, global = true, default_value = "simple_deployment.json")]
    deployment: PathBuf,

    /// Application id, instead of reading the deployment file
    #[arg(long, global = true)]
    app_id: Option<u64>,

    /// Rounds to wait for confirmation
    #[arg(long, global = true)]
    max_rounds: Option<NonZeroU32>,

    /// strict, prefer-derived or prefer-stored
    #[arg(long, global = true)]
    address_policy: Option<ReconciliationPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Opt the wallet account in to the application
    #[command(name = "opt-in")]
    OptIn,
    /// Deposit an amount, in whole units, into the application
    #[command(name = "deposit")]
    Deposit { amount: f64 },
    /// Ask the application to log its state
    #[command(name = "info")]
    Info,
    /// Rewrite the wallet file with the address derived from its secret phrase
    #[command(name = "repair-wallet")]
    RepairWallet,
    /// Show an account balance, the wallet account by default
    #[command(name = "balance")]
    Balance { address: Option<String> },
}

impl Args {
    fn config(&self) -> Result<DepositConfig> {
        let mut config = DepositConfig::from_environment()?;
        if let Some(rounds) = self.max_rounds {
            config.max_rounds_to_wait = rounds;
        }
        if let Some(policy) = self.address_policy {
            config.reconciliation = policy;
        }
        Ok(config)
    }

    fn app_id(&self) -> Result<u64> {
        match self.app_id {
            Some(app_id) => Ok(DeploymentRecord::new(app_id)?.app_id),
            None => Ok(DeploymentRecord::load(&self.deployment)
                .wrap_err_with(|| {
                    format!("reading deployment from {}", self.deployment.display())
                })?
                .app_id),
        }
    }
}

async fn execute_command(args: &Args) -> Result<()> {
    let store = JsonFileCredentialStore::new(&args.wallet);

    if args.command == Commands::RepairWallet {
        let outcome = repair_credentials(&store)?;
        println!("{}", report::repair(&outcome));
        return Ok(());
    }

    let client = DepositClient::new(args.config()?)?;
    log::debug!("Using algod at {}", client.config().algod.base_url());

    match &args.command {
        Commands::OptIn => {
            let identity = client.load_identity(&store)?;
            match client.opt_in(&identity, args.app_id()?).await {
                Ok(result) => println!("{}", report::confirmation("Opted in", &result)),
                Err(error) if error.is_already_opted_in() => {
                    println!("{} is already opted in", identity.address());
                }
                Err(error) => return Err(error.into()),
            }
        }
        Commands::Deposit { amount } => {
            let identity = client.load_identity(&store)?;
            let result = client.deposit(&identity, args.app_id()?, *amount).await?;
            println!("{}", report::confirmation("Deposited", &result));
        }
        Commands::Info => {
            let identity = client.load_identity(&store)?;
            let result = client.info(&identity, args.app_id()?).await?;
            println!("{}", report::confirmation("Info", &result));
        }
        Commands::Balance { address } => {
            let address: Address = match address {
                Some(text) => text.parse()?,
                None => client.load_identity(&store)?.address().clone(),
            };
            let info = client.account_balance(&address).await?;
            println!(
                "{}",
                report::balance(&info, client.config().micro_units_per_unit)
            );
        }
        Commands::RepairWallet => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    execute_command(&args).await
}
