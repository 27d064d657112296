//! The `sealkit` command-line interface.
//!
//! Results go to stdout as plain text or JSON. Errors go to stderr as
//! `error: <message>` or as a JSON `{ kind, message }` object.
//!
//! Exit codes: `0` success, `1` any failure, `2` a well-formed signature
//! that does not verify.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use sealkit_core::{KeyMode, KeyUsage};

use crate::commands::keys::{KeygenJob, KeygenStatus};
use crate::commands::{self, SharedProvider};
use crate::error::CommandError;
use crate::logging;
use crate::preferences::{self, Preferences};

/// Exit code for any failed command.
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for `verify` when the signature does not match.
pub const EXIT_SIGNATURE_MISMATCH: u8 = 2;

/// Input argument that means "read standard input".
const STDIN_ARG: &str = "-";

const KEYGEN_POLL_INTERVAL: Duration = Duration::from_millis(250);

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "sealkit",
    version,
    about = "Password envelopes, RSA-OAEP encryption and RSA-PSS signatures"
)]
pub struct Cli {
    /// Directory holding preferences.json
    #[arg(long, env = "SEALKIT_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a random 256-bit key (base64)
    GenKey,

    /// Generate a 2048-bit RSA key pair (PEM)
    GenKeypair {
        /// What the pair will be used for
        #[arg(long, value_enum)]
        usage: UsageArg,

        /// Write the public key here instead of printing it
        #[arg(long)]
        public_out: Option<PathBuf>,

        /// Write the private key here instead of printing it
        #[arg(long)]
        private_out: Option<PathBuf>,
    },

    /// Seal text into a base64 envelope
    Seal {
        /// Text to seal, or `-` for stdin
        text: String,

        /// Password, or base64 key in raw-key mode
        #[arg(long, env = "SEALKIT_SECRET", hide_env_values = true)]
        secret: String,

        /// Key mode (defaults to the configured mode)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Open a base64 envelope
    Open {
        /// Envelope, or `-` for stdin
        envelope: String,

        /// Password, or base64 key in raw-key mode
        #[arg(long, env = "SEALKIT_SECRET", hide_env_values = true)]
        secret: String,

        /// Key mode the envelope was sealed with
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Encrypt a short text (at most 190 bytes) with an RSA public key
    Encrypt {
        /// Text to encrypt, or `-` for stdin
        text: String,

        /// Encryption public key PEM file
        #[arg(long)]
        public_key: PathBuf,
    },

    /// Decrypt a base64 RSA-OAEP ciphertext
    Decrypt {
        /// Ciphertext, or `-` for stdin
        ciphertext: String,

        /// Encryption private key PEM file
        #[arg(long)]
        private_key: PathBuf,
    },

    /// Sign a message with an RSA-PSS private key
    Sign {
        /// Message, or `-` for stdin
        message: String,

        /// Signing private key PEM file
        #[arg(long)]
        private_key: PathBuf,
    },

    /// Verify a base64 RSA-PSS signature (exit code 2 if it does not match)
    Verify {
        /// Message, or `-` for stdin
        message: String,

        /// base64 signature
        #[arg(long)]
        signature: String,

        /// Signing public key PEM file
        #[arg(long)]
        public_key: PathBuf,
    },

    /// Show or change preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Print current preferences
    Show,
    /// Set the default key mode for seal/open
    SetMode {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Restore defaults
    Reset,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageArg {
    Encrypt,
    Sign,
}

impl From<UsageArg> for KeyUsage {
    fn from(arg: UsageArg) -> Self {
        match arg {
            UsageArg::Encrypt => Self::Encrypt,
            UsageArg::Sign => Self::Sign,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Password,
    RawKey,
}

impl From<ModeArg> for KeyMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Password => Self::Password,
            ModeArg::RawKey => Self::RawKey,
        }
    }
}

// ── Execution ─────────────────────────────────────────────────────────────────

/// Everything a command needs besides its own arguments.
pub struct Context {
    pub provider: SharedProvider,
    pub prefs: Preferences,
    pub config_dir: Option<PathBuf>,
    /// Print key generation progress to stderr.
    pub progress: bool,
}

/// A rendered command result.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub text: String,
    pub json: serde_json::Value,
    pub exit_code: u8,
}

impl Output {
    fn new<T: Serialize>(dto: &T, text: impl Into<String>) -> Result<Self, CommandError> {
        let json = serde_json::to_value(dto)
            .map_err(|e| CommandError::internal(format!("failed to serialize result: {e}")))?;
        Ok(Self {
            text: text.into(),
            json,
            exit_code: 0,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyPairOutput {
    usage: KeyUsage,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_pem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_pem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_path: Option<PathBuf>,
}

fn read_input(arg: String) -> Result<String, CommandError> {
    if arg != STDIN_ARG {
        return Ok(arg);
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| CommandError::invalid_request(format!("failed to read stdin: {e}")))?;
    // A trailing newline from `echo` or a heredoc is not part of the input.
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    Ok(input)
}

fn read_pem(path: &Path) -> Result<String, CommandError> {
    fs::read_to_string(path).map_err(|e| {
        CommandError::invalid_request(format!("failed to read {}: {e}", path.display()))
    })
}

/// Create a new key file; refuses to overwrite. Private keys are owner-only.
fn create_key_file(path: &Path, private: bool) -> Result<fs::File, CommandError> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if private {
            options.mode(0o600);
        }
    }
    #[cfg(not(unix))]
    let _ = private;

    options.open(path).map_err(|e| {
        CommandError::invalid_request(format!("failed to create {}: {e}", path.display()))
    })
}

/// Write every `(path, pem, private)` target, or leave none of them behind.
///
/// All files are created before any is written, so an existing or
/// unwritable path fails the command without touching the others.
fn write_key_files(targets: &[(&Path, &str, bool)]) -> Result<(), CommandError> {
    let mut created = Vec::with_capacity(targets.len());
    for &(path, pem, private) in targets {
        match create_key_file(path, private) {
            Ok(file) => created.push((path, pem, file)),
            Err(e) => {
                discard_key_files(created);
                return Err(e);
            }
        }
    }

    let written = created.iter_mut().try_for_each(|(path, pem, file)| {
        file.write_all(pem.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .map_err(|e| {
                CommandError::internal(format!("failed to write {}: {e}", path.display()))
            })
    });
    if written.is_err() {
        discard_key_files(created);
    }
    written
}

fn discard_key_files(created: Vec<(&Path, &str, fs::File)>) {
    for (path, _, file) in created {
        drop(file);
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial key file");
        }
    }
}

fn require_config_dir(ctx: &Context) -> Result<&Path, CommandError> {
    ctx.config_dir.as_deref().ok_or_else(|| {
        CommandError::invalid_request("no config directory available; pass --config-dir")
    })
}

async fn generate_key_pair(
    ctx: &Context,
    usage: KeyUsage,
    public_out: Option<PathBuf>,
    private_out: Option<PathBuf>,
) -> Result<Output, CommandError> {
    let job = KeygenJob::spawn(ctx.provider.clone(), usage)?;
    if ctx.progress {
        eprint!("generating 2048-bit {usage} key pair");
        while job.status() == KeygenStatus::Running {
            tokio::time::sleep(KEYGEN_POLL_INTERVAL).await;
            eprint!(".");
        }
        eprintln!();
    }
    let pair = job.wait().await?;

    let targets: Vec<(&Path, &str, bool)> = [
        public_out.as_deref().map(|p| (p, pair.public_pem.as_str(), false)),
        private_out.as_deref().map(|p| (p, pair.private_pem.as_str(), true)),
    ]
    .into_iter()
    .flatten()
    .collect();
    write_key_files(&targets)?;

    let mut text = Vec::with_capacity(2);
    text.push(public_out.as_ref().map_or_else(
        || pair.public_pem.clone(),
        |p| format!("public key written to {}", p.display()),
    ));
    text.push(private_out.as_ref().map_or_else(
        || pair.private_pem.clone(),
        |p| format!("private key written to {}", p.display()),
    ));

    let dto = KeyPairOutput {
        usage,
        public_pem: public_out.is_none().then(|| pair.public_pem.clone()),
        public_path: public_out,
        private_pem: private_out.is_none().then(|| pair.private_pem.clone()),
        private_path: private_out,
    };
    Output::new(&dto, text.join("\n"))
}

/// Run one command.
///
/// # Errors
///
/// Returns the command's [`CommandError`]. A non-matching signature is not
/// an error: it yields an [`Output`] with [`EXIT_SIGNATURE_MISMATCH`].
pub async fn execute(command: Command, ctx: &Context) -> Result<Output, CommandError> {
    let provider = || ctx.provider.clone();

    match command {
        Command::GenKey => {
            let result = commands::keys::generate_symmetric_key(provider()).await?;
            Output::new(&result, result.key.clone())
        }
        Command::GenKeypair {
            usage,
            public_out,
            private_out,
        } => generate_key_pair(ctx, usage.into(), public_out, private_out).await,
        Command::Seal { text, secret, mode } => {
            let request = commands::envelope::SealRequest {
                plaintext: read_input(text)?,
                secret,
                mode: mode.map_or(ctx.prefs.default_mode, KeyMode::from),
            };
            let result = commands::envelope::seal(provider(), request).await?;
            Output::new(&result, result.envelope.clone())
        }
        Command::Open {
            envelope,
            secret,
            mode,
        } => {
            let request = commands::envelope::OpenRequest {
                envelope: read_input(envelope)?,
                secret,
                mode: mode.map_or(ctx.prefs.default_mode, KeyMode::from),
            };
            let result = commands::envelope::open(provider(), request).await?;
            Output::new(&result, result.plaintext.clone())
        }
        Command::Encrypt { text, public_key } => {
            let request = commands::cipher::EncryptRequest {
                plaintext: read_input(text)?,
                public_pem: read_pem(&public_key)?,
            };
            let result = commands::cipher::encrypt(provider(), request).await?;
            Output::new(&result, result.ciphertext.clone())
        }
        Command::Decrypt {
            ciphertext,
            private_key,
        } => {
            let request = commands::cipher::DecryptRequest {
                ciphertext: read_input(ciphertext)?,
                private_pem: read_pem(&private_key)?,
            };
            let result = commands::cipher::decrypt(provider(), request).await?;
            Output::new(&result, result.plaintext.clone())
        }
        Command::Sign {
            message,
            private_key,
        } => {
            let request = commands::signature::SignRequest {
                message: read_input(message)?,
                private_pem: read_pem(&private_key)?,
            };
            let result = commands::signature::sign(provider(), request).await?;
            Output::new(&result, result.signature.clone())
        }
        Command::Verify {
            message,
            signature,
            public_key,
        } => {
            let request = commands::signature::VerifyRequest {
                message: read_input(message)?,
                signature,
                public_pem: read_pem(&public_key)?,
            };
            let result = commands::signature::verify(provider(), request).await?;
            let mut output = Output::new(&result, if result.valid { "valid" } else { "invalid" })?;
            if !result.valid {
                output.exit_code = EXIT_SIGNATURE_MISMATCH;
            }
            Ok(output)
        }
        Command::Config { action } => {
            let prefs = match action {
                ConfigAction::Show => ctx
                    .config_dir
                    .as_deref()
                    .map_or_else(|| ctx.prefs.clone(), commands::preferences::get_preferences),
                ConfigAction::SetMode { mode } => {
                    commands::preferences::set_default_mode(require_config_dir(ctx)?, mode.into())?
                }
                ConfigAction::Reset => {
                    commands::preferences::reset_preferences(require_config_dir(ctx)?)?
                }
            };
            let text = serde_json::to_string_pretty(&prefs)
                .map_err(|e| CommandError::internal(format!("failed to render preferences: {e}")))?;
            Output::new(&prefs, text)
        }
    }
}

fn print_error(err: &CommandError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(rendered) => eprintln!("{rendered}"),
            Err(_) => eprintln!("error: {err}"),
        }
    } else {
        eprintln!("error: {err}");
    }
}

/// Parse-independent entry point used by `main`.
pub async fn run(cli: Cli) -> ExitCode {
    let config_dir = cli.config_dir.or_else(preferences::default_config_dir);
    let prefs = config_dir
        .as_deref()
        .map(Preferences::load)
        .unwrap_or_default();
    logging::init(&prefs);

    let json = cli.json || prefs.json_output;
    let ctx = Context {
        provider: commands::system_provider(),
        prefs,
        config_dir,
        progress: !json,
    };

    match execute(cli.command, &ctx).await {
        Ok(output) => {
            if json {
                println!("{}", output.json);
            } else {
                println!("{}", output.text);
            }
            ExitCode::from(output.exit_code)
        }
        Err(err) => {
            print_error(&err, json);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
