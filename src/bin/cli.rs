//! flightclaim CLI
//!
//! Command-line front end for the claim API: account commands, the claim
//! wizard driven from a draft file, and staff case/document/user management.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use flightclaim::{
    error::{AppError, Result},
    locale::Translations,
    models::{Config, DocumentType, NewUser, RegisterRequest, Role},
    pipeline::{CaseSubmitter, CompensationEstimator, SubmissionOutcome},
    services::{
        AirportService, ApiClient, AuthService, CaseService, ContractService, DocumentService,
        UserService,
    },
    session::{RouteAccess, SessionState},
    storage::LocalStorage,
    wizard::{ClaimDraft, WizardSession},
};

/// flightclaim - Flight disruption compensation claims
#[derive(Parser, Debug)]
#[command(
    name = "flightclaim",
    version,
    about = "Flight disruption compensation claim client"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create a client account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },

    /// Request a password reset e-mail
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Set a new password with a reset token
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
    },

    /// Change the signed-in user's password
    ChangePassword {
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show or select the interface language
    Language {
        /// Language code to select
        code: Option<String>,
    },

    /// List airports, optionally filtered by code, name or city
    Airports { query: Option<String> },

    /// Compensation estimate for a route
    Compensation { departing: String, destination: String },

    /// Check eligibility and submit a claim from a draft file
    Submit {
        /// TOML file with every wizard answer
        #[arg(long)]
        draft: PathBuf,
    },

    /// Case management
    Cases {
        #[command(subcommand)]
        command: CaseCommand,
    },

    /// Supporting documents
    Documents {
        #[command(subcommand)]
        command: DocumentCommand,
    },

    /// Generate the contract PDF for a case
    Contract {
        #[arg(long)]
        case: String,
        #[arg(long)]
        out: PathBuf,
    },

    /// User accounts (admin)
    Users {
        #[command(subcommand)]
        command: AccountCommand,
    },

    /// Employee accounts (admin)
    Employees {
        #[command(subcommand)]
        command: AccountCommand,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(Subcommand, Debug)]
enum CaseCommand {
    /// All cases (staff)
    List,
    /// The signed-in client's cases
    Mine,
    /// One case
    Get { id: String },
    /// Delete a case (staff)
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum DocumentCommand {
    /// Documents attached to a case
    List {
        #[arg(long)]
        case: String,
    },
    /// Show one document
    Get { id: String },
    /// Attach a file to a case
    Upload {
        #[arg(long)]
        case: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum, default_value = "other")]
        kind: DocumentKind,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    List,
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DocumentKind {
    BoardingPass,
    Reservation,
    IdDocument,
    Contract,
    Other,
}

impl From<DocumentKind> for DocumentType {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::BoardingPass => DocumentType::BoardingPass,
            DocumentKind::Reservation => DocumentType::Reservation,
            DocumentKind::IdDocument => DocumentType::IdDocument,
            DocumentKind::Contract => DocumentType::Contract,
            DocumentKind::Other => DocumentType::Other,
        }
    }
}

impl Command {
    /// Who may run the command.
    fn access(&self) -> RouteAccess {
        match self {
            Command::Signin { .. } | Command::Register { .. } => RouteAccess::GuestOnly,
            Command::ForgotPassword { .. }
            | Command::ResetPassword { .. }
            | Command::Logout
            | Command::Whoami
            | Command::Language { .. }
            | Command::Validate => RouteAccess::Public,
            Command::Cases {
                command: CaseCommand::List | CaseCommand::Delete { .. },
            } => RouteAccess::Staff,
            Command::Users { .. } | Command::Employees { .. } => RouteAccess::Admin,
            Command::Contract { .. } => RouteAccess::Staff,
            _ => RouteAccess::Authenticated,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn new_user(
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    role: Role,
) -> NewUser {
    NewUser {
        email,
        password,
        first_name,
        last_name,
        role: Some(role),
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);
    init_logging(cli.verbose, &config.logging.level);

    let session = Arc::new(SessionState::new(
        &config,
        Arc::new(LocalStorage::new(config.session.session_dir())),
        Arc::new(LocalStorage::new(config.session.durable_dir())),
    ));
    session.restore().await?;

    let language = session.language().await?;
    let translations = Translations::load_or_empty(&config.locale, &language);

    if let Err(e) = session.require(cli.command.access()) {
        println!("{}", translations.notification(&e));
        return Err(e);
    }

    let api = ApiClient::new(&config.api, Arc::clone(&session))?;

    match run(cli.command, &config, &api, &session).await {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("{}", e);
            println!("{}", translations.notification(&e));
            Err(e)
        }
    }
}

async fn run(
    command: Command,
    config: &Config,
    api: &ApiClient,
    session: &SessionState,
) -> Result<()> {
    match command {
        Command::Signin { email, password } => {
            let outcome = AuthService::new(api.clone()).sign_in(&email, &password).await?;
            match outcome.identity {
                Some(identity) => {
                    println!("Signed in as {}", identity.email.unwrap_or(identity.user_id));
                    if outcome.is_first_login {
                        println!("First sign-in: please change your password.");
                    }
                }
                None => println!("Sign-in returned an unusable token; still signed out."),
            }
        }

        Command::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let request = RegisterRequest {
                email,
                password,
                first_name,
                last_name,
            };
            AuthService::new(api.clone()).register(&request).await?;
            println!("Account created for {}", request.email);
        }

        Command::ForgotPassword { email } => {
            AuthService::new(api.clone()).forgot_password(&email).await?;
            println!("If {email} has an account, a reset link is on its way.");
        }

        Command::ResetPassword { token, password } => {
            AuthService::new(api.clone()).reset_password(&token, &password).await?;
            println!("Password reset.");
        }

        Command::ChangePassword { password } => {
            let user_id = session.user_id().ok_or(AppError::NotAuthenticated)?;
            AuthService::new(api.clone())
                .update_password(&user_id, &password)
                .await?;
            println!("Password updated.");
        }

        Command::Logout => {
            AuthService::new(api.clone()).sign_out().await?;
            println!("Signed out.");
        }

        Command::Whoami => match session.identity() {
            Some(identity) => {
                println!("User:    {}", identity.user_id);
                println!("E-mail:  {}", identity.email.as_deref().unwrap_or("-"));
                println!(
                    "Role:    {}",
                    identity.role.map(|r| format!("{r:?}")).unwrap_or_else(|| "-".into())
                );
                println!("Expires: {}", identity.expires_at);
            }
            None => println!("Not signed in."),
        },

        Command::Language { code } => {
            if let Some(code) = code {
                session.set_language(&code).await?;
            }
            println!("{}", session.language().await?);
        }

        Command::Airports { query } => {
            let airports = AirportService::new(api.clone()).fetch_airports().await?;
            let matching = airports
                .iter()
                .filter(|a| query.as_deref().is_none_or(|q| a.matches(q)));
            for airport in matching {
                println!("{}", airport.label());
            }
        }

        Command::Compensation {
            departing,
            destination,
        } => {
            let estimator = CompensationEstimator::new(AirportService::new(api.clone()));
            let amount = estimator
                .estimate(&departing.to_uppercase(), &destination.to_uppercase())
                .await?;
            println!("{amount:.2} EUR");
        }

        Command::Submit { draft } => {
            let draft = ClaimDraft::load(&draft)?;
            let mut wizard = WizardSession::new();
            let reason = draft.apply(&mut wizard)?;
            log::info!("Disruption classified as {}", reason);

            let client_id = session.user_id().ok_or(AppError::NotAuthenticated)?;
            let case = wizard.draft_case(&client_id, Utc::now())?;
            let submitter = CaseSubmitter::new(Arc::new(CaseService::new(api.clone())));

            match submitter.submit(&case).await? {
                SubmissionOutcome::Created(record) => {
                    wizard.mark_submitted()?;
                    println!("Case submitted: {}", record.summary());
                }
                SubmissionOutcome::NotEligible => {
                    println!("This reservation is not eligible for compensation.");
                }
            }
        }

        Command::Cases { command } => {
            let cases = CaseService::new(api.clone());
            match command {
                CaseCommand::List => {
                    for case in cases.list_cases().await? {
                        println!("{}", case.summary());
                    }
                }
                CaseCommand::Mine => {
                    let client_id = session.user_id().ok_or(AppError::NotAuthenticated)?;
                    for case in cases.cases_for_client(&client_id).await? {
                        println!("{}", case.summary());
                    }
                }
                CaseCommand::Get { id } => {
                    let case = cases.get_case(&id).await?;
                    println!("{}", serde_json::to_string_pretty(&case)?);
                }
                CaseCommand::Delete { id } => {
                    cases.delete_case(&id).await?;
                    println!("Deleted case {id}");
                }
            }
        }

        Command::Documents { command } => {
            let documents = DocumentService::new(api.clone());
            match command {
                DocumentCommand::List { case } => {
                    for document in documents.documents_for_case(&case).await? {
                        let kind = document
                            .document_type
                            .map(|t| t.to_string())
                            .unwrap_or_else(|| "-".into());
                        println!("#{} [{}] {}", document.id, kind, document.name);
                    }
                }
                DocumentCommand::Get { id } => {
                    let document = documents.get_document(&id).await?;
                    println!("{}", serde_json::to_string_pretty(&document)?);
                }
                DocumentCommand::Upload {
                    case,
                    file,
                    name,
                    kind,
                } => {
                    let document = documents
                        .upload(&case, &file, name.as_deref(), kind.into())
                        .await?;
                    println!("Uploaded document #{}", document.id);
                }
            }
        }

        Command::Contract { case, out } => {
            let record = CaseService::new(api.clone()).get_case(&case).await?;
            let pdf = ContractService::new(api.clone())
                .generate_contract(&record)
                .await?;
            tokio::fs::write(&out, &pdf).await?;
            println!("Contract written to {} ({} bytes)", out.display(), pdf.len());
        }

        Command::Users { command } => {
            let users = UserService::new(api.clone());
            match command {
                AccountCommand::List => {
                    for user in users.list_users().await? {
                        println!("#{} {}", user.id, user.display_name());
                    }
                }
                AccountCommand::Create {
                    email,
                    password,
                    first_name,
                    last_name,
                } => {
                    let user = new_user(email, password, first_name, last_name, Role::Client);
                    let user = users.create_user(&user).await?;
                    println!("Created user #{}", user.id);
                }
            }
        }

        Command::Employees { command } => {
            let users = UserService::new(api.clone());
            match command {
                AccountCommand::List => {
                    for user in users.list_employees().await? {
                        println!("#{} {}", user.id, user.display_name());
                    }
                }
                AccountCommand::Create {
                    email,
                    password,
                    first_name,
                    last_name,
                } => {
                    let user = users
                        .create_employee(&new_user(
                            email,
                            password,
                            first_name,
                            last_name,
                            Role::Employee,
                        ))
                        .await?;
                    println!("Created employee #{}", user.id);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("Config OK");
        }
    }

    Ok(())
}
