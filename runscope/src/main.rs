//! Runscope CLI: inspect and manage buckets, tests, environments, schedules,
//! and results from the terminal.

mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use output::{OutputFormat, Printer};
use runscope_lib::{
    get_api_token, parse_runscope_url, parse_time, Client, ClientOptions, Environment,
    ListResultsOptions, ListTestsOptions, Schedule, Step, Team, Test, BASE_URL, VALID_INTERVALS,
};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "runscope")]
#[command(about = "Runscope CLI - inspect buckets, tests, schedules, and results", long_about = None)]
struct Cli {
    /// Output format: plain (human-readable), json (structured).
    #[arg(short, long, default_value = "plain", value_enum, global = true)]
    output: OutputFormatArg,

    /// API base URL.
    #[arg(long, env = "RUNSCOPE_BASE_URL", default_value = BASE_URL, global = true)]
    base_url: String,

    /// Show timestamps in UTC. By default timestamps are shown in local timezone.
    #[arg(long, global = true)]
    utc: bool,

    /// Log requests to stderr. RUST_LOG overrides this.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the account that owns the token
    Account,
    /// List regions tests can run from
    Regions,
    /// List buckets
    Buckets,
    /// Show one bucket
    Bucket { bucket_key: String },
    /// Create a bucket in a team
    CreateBucket {
        name: String,
        /// Team UUID (see `runscope account`)
        #[arg(long)]
        team: String,
    },
    /// Delete a bucket and everything in it
    DeleteBucket { bucket_key: String },
    /// List tests in a bucket
    Tests {
        bucket_key: String,
        #[arg(long)]
        count: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Show one test with its steps, environments, and schedules
    Test { bucket_key: String, test_id: String },
    /// Create a test from a JSON file
    CreateTest {
        bucket_key: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a test
    DeleteTest { bucket_key: String, test_id: String },
    /// List steps of a test
    Steps { bucket_key: String, test_id: String },
    /// Show one step
    Step {
        bucket_key: String,
        test_id: String,
        step_id: String,
    },
    /// Append a step read from a JSON file
    CreateStep {
        bucket_key: String,
        test_id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a step
    DeleteStep {
        bucket_key: String,
        test_id: String,
        step_id: String,
    },
    /// List shared environments, or a test's environments with --test
    Environments {
        bucket_key: String,
        #[arg(long)]
        test: Option<String>,
    },
    /// Show one environment (shared unless --test is given)
    Environment {
        bucket_key: String,
        environment_id: String,
        #[arg(long)]
        test: Option<String>,
    },
    /// Create an environment from a JSON file (shared unless --test is given)
    CreateEnvironment {
        bucket_key: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        test: Option<String>,
    },
    /// Delete an environment (shared unless --test is given)
    DeleteEnvironment {
        bucket_key: String,
        environment_id: String,
        #[arg(long)]
        test: Option<String>,
    },
    /// List schedules of a test
    Schedules { bucket_key: String, test_id: String },
    /// Show one schedule
    Schedule {
        bucket_key: String,
        test_id: String,
        schedule_id: String,
    },
    /// Schedule a test to run against an environment
    CreateSchedule {
        bucket_key: String,
        test_id: String,
        #[arg(long)]
        environment: String,
        #[arg(long, value_parser = VALID_INTERVALS)]
        interval: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a schedule
    DeleteSchedule {
        bucket_key: String,
        test_id: String,
        schedule_id: String,
    },
    /// List recent results of a test
    Results {
        bucket_key: String,
        test_id: String,
        #[arg(long)]
        count: Option<u32>,
        /// Only runs after this time (ISO 8601 or epoch seconds)
        #[arg(long)]
        since: Option<String>,
        /// Only runs before this time (ISO 8601 or epoch seconds)
        #[arg(long)]
        before: Option<String>,
    },
    /// Show one result; the latest when no run id is given
    Result {
        bucket_key: String,
        test_id: String,
        test_run_id: Option<String>,
    },
    /// List people in a team
    People { team_id: String },
    /// List integrations of a team
    Integrations { team_id: String },
    /// Parse a Runscope URL and print extracted IDs
    ParseUrl { url: String },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let printer = Printer::new(
        match cli.output {
            OutputFormatArg::Plain => OutputFormat::Plain,
            OutputFormatArg::Json => OutputFormat::Json,
        },
        cli.utc,
    );

    match cli.command {
        Commands::Version => {
            println!("runscope {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Commands::ParseUrl { ref url } => {
            return finish(
                parse_runscope_url(url).and_then(|parsed| printer.print(&parsed)),
            );
        }
        _ => {}
    }

    let client = match connect(&cli.base_url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    finish(run(&client, cli.command, printer).await)
}

fn finish(result: Result<(), String>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "runscope_lib=debug,runscope=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn connect(base_url: &str) -> Result<Client, String> {
    let (token, source) = get_api_token()?;
    tracing::debug!(?source, "using API token");
    let options = ClientOptions::new(token)
        .env_overrides()
        .map_err(|e| e.to_string())?
        .base_url(base_url);
    Client::new(options).map_err(|e| e.to_string())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))
}

fn parse_optional_time(value: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    value.map(parse_time).transpose()
}

async fn run(client: &Client, cmd: Commands, printer: Printer) -> Result<(), String> {
    match cmd {
        Commands::Account => {
            let account = client.get_account().await.map_err(|e| e.to_string())?;
            printer.print(&account)?;
        }
        Commands::Regions => {
            let regions = client.list_regions().await.map_err(|e| e.to_string())?;
            printer.print(&regions.regions)?;
        }
        Commands::Buckets => {
            let buckets = client.list_buckets().await.map_err(|e| e.to_string())?;
            printer.print(&buckets)?;
        }
        Commands::Bucket { bucket_key } => {
            let bucket = client
                .get_bucket(&bucket_key)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&bucket)?;
        }
        Commands::CreateBucket { name, team } => {
            let bucket = client
                .create_bucket(&name, &Team::with_uuid(team))
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&bucket)?;
        }
        Commands::DeleteBucket { bucket_key } => {
            client
                .delete_bucket(&bucket_key)
                .await
                .map_err(|e| e.to_string())?;
            eprintln!("Deleted bucket {}", bucket_key);
        }
        Commands::Tests {
            bucket_key,
            count,
            offset,
        } => {
            let tests = client
                .list_tests(&bucket_key, &ListTestsOptions { count, offset })
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&tests)?;
        }
        Commands::Test {
            bucket_key,
            test_id,
        } => {
            let test = client
                .get_test(&bucket_key, &test_id)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&test)?;
        }
        Commands::CreateTest { bucket_key, file } => {
            let test: Test = read_json(&file)?;
            let created = client
                .create_test(&bucket_key, &test)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&created)?;
        }
        Commands::DeleteTest {
            bucket_key,
            test_id,
        } => {
            client
                .delete_test(&bucket_key, &test_id)
                .await
                .map_err(|e| e.to_string())?;
            eprintln!("Deleted test {}", test_id);
        }
        Commands::Steps {
            bucket_key,
            test_id,
        } => {
            let steps = client
                .list_steps(&bucket_key, &test_id)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&steps)?;
        }
        Commands::Step {
            bucket_key,
            test_id,
            step_id,
        } => {
            let step = client
                .get_step(&bucket_key, &test_id, &step_id)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&step)?;
        }
        Commands::CreateStep {
            bucket_key,
            test_id,
            file,
        } => {
            let step: Step = read_json(&file)?;
            let created = client
                .create_step(&bucket_key, &test_id, &step)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&created)?;
        }
        Commands::DeleteStep {
            bucket_key,
            test_id,
            step_id,
        } => {
            client
                .delete_step(&bucket_key, &test_id, &step_id)
                .await
                .map_err(|e| e.to_string())?;
            eprintln!("Deleted step {}", step_id);
        }
        Commands::Environments { bucket_key, test } => {
            let envs = match test {
                Some(test_id) => client.list_test_environments(&bucket_key, &test_id).await,
                None => client.list_shared_environments(&bucket_key).await,
            }
            .map_err(|e| e.to_string())?;
            printer.print(&envs)?;
        }
        Commands::Environment {
            bucket_key,
            environment_id,
            test,
        } => {
            let env = match test {
                Some(test_id) => {
                    client
                        .get_test_environment(&bucket_key, &test_id, &environment_id)
                        .await
                }
                None => {
                    client
                        .get_shared_environment(&bucket_key, &environment_id)
                        .await
                }
            }
            .map_err(|e| e.to_string())?;
            printer.print(&env)?;
        }
        Commands::CreateEnvironment {
            bucket_key,
            file,
            test,
        } => {
            let env: Environment = read_json(&file)?;
            let created = match test {
                Some(test_id) => {
                    client
                        .create_test_environment(&bucket_key, &test_id, &env)
                        .await
                }
                None => client.create_shared_environment(&bucket_key, &env).await,
            }
            .map_err(|e| e.to_string())?;
            printer.print(&created)?;
        }
        Commands::DeleteEnvironment {
            bucket_key,
            environment_id,
            test,
        } => {
            match test {
                Some(test_id) => {
                    client
                        .delete_test_environment(&bucket_key, &test_id, &environment_id)
                        .await
                }
                None => client.delete_environment(&bucket_key, &environment_id).await,
            }
            .map_err(|e| e.to_string())?;
            eprintln!("Deleted environment {}", environment_id);
        }
        Commands::Schedules {
            bucket_key,
            test_id,
        } => {
            let schedules = client
                .list_schedules(&bucket_key, &test_id)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&schedules)?;
        }
        Commands::Schedule {
            bucket_key,
            test_id,
            schedule_id,
        } => {
            let schedule = client
                .get_schedule(&bucket_key, &test_id, &schedule_id)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&schedule)?;
        }
        Commands::CreateSchedule {
            bucket_key,
            test_id,
            environment,
            interval,
            note,
        } => {
            let mut schedule = Schedule::new(environment, interval);
            schedule.note = note;
            let created = client
                .create_schedule(&bucket_key, &test_id, &schedule)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&created)?;
        }
        Commands::DeleteSchedule {
            bucket_key,
            test_id,
            schedule_id,
        } => {
            client
                .delete_schedule(&bucket_key, &test_id, &schedule_id)
                .await
                .map_err(|e| e.to_string())?;
            eprintln!("Deleted schedule {}", schedule_id);
        }
        Commands::Results {
            bucket_key,
            test_id,
            count,
            since,
            before,
        } => {
            let options = ListResultsOptions {
                count,
                since: parse_optional_time(since.as_deref())?,
                before: parse_optional_time(before.as_deref())?,
            };
            let results = client
                .list_results(&bucket_key, &test_id, &options)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&results)?;
        }
        Commands::Result {
            bucket_key,
            test_id,
            test_run_id,
        } => {
            let result = match test_run_id {
                Some(run_id) => client.get_result(&bucket_key, &test_id, &run_id).await,
                None => client.get_latest_result(&bucket_key, &test_id).await,
            }
            .map_err(|e| e.to_string())?;
            printer.print(&result)?;
        }
        Commands::People { team_id } => {
            let people = client
                .list_people(&team_id)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&people)?;
        }
        Commands::Integrations { team_id } => {
            let integrations = client
                .list_integrations(&team_id)
                .await
                .map_err(|e| e.to_string())?;
            printer.print(&integrations)?;
        }
        Commands::ParseUrl { .. } | Commands::Version => {}
    }
    Ok(())
}
