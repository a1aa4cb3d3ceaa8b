use clap::{Parser, ValueEnum};
use intent_auth::application::controller::PaymentAuthController;
use intent_auth::config::{AuthConfig, DEFAULT_REQUEST_CODE};
use intent_auth::domain::auth::{AuthCallback, FlowCompletion, HostContext, PaymentAuthResult};
use intent_auth::domain::params::{ConfirmPaymentIntentParams, Credential};
use intent_auth::domain::payment_intent::PaymentIntent;
use intent_auth::error::{AuthError, Result as AuthResult};
use intent_auth::infrastructure::executor::TokioCallbackExecutor;
use intent_auth::infrastructure::flow_launcher::{LaunchedFlow, RecordingFlowLauncher};
use intent_auth::infrastructure::in_memory::InMemoryIntentApi;
use intent_auth::interfaces::json::intent_reader::IntentReader;
use intent_auth::interfaces::json::outcome_writer::{OutcomeRecord, OutcomeWriter};
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Result code a host reports for a flow that ran to completion.
const RESULT_OK: i32 = -1;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Completion {
    Completed,
    Canceled,
    Failed,
}

/// Runs payment intents through authentication against a simulated host.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with one or more payment intents
    input: PathBuf,

    /// Confirm each intent before authenticating it
    #[arg(long)]
    confirm: bool,

    /// How the simulated host finishes every launched flow
    #[arg(long, value_enum, default_value_t = Completion::Completed)]
    completion: Completion,

    /// Server-side status of an intent once its flow has completed
    #[arg(long, default_value = "succeeded")]
    final_status: String,

    #[arg(long, default_value_t = DEFAULT_REQUEST_CODE)]
    request_code: i32,

    /// Return URL used when a redirect payload carries none
    #[arg(long)]
    return_url: Option<String>,

    #[arg(long, default_value = "pk_test_simulator")]
    api_key: String,

    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AuthConfig::default().with_request_code(cli.request_code);
    if let Some(return_url) = &cli.return_url {
        config = config.with_return_url(return_url.clone());
    }

    let api = InMemoryIntentApi::new();
    let (launcher, mut flows) = RecordingFlowLauncher::with_channel();
    let controller = PaymentAuthController::new(
        config,
        Arc::new(api.clone()),
        Arc::new(launcher),
        Arc::new(TokioCallbackExecutor::current()),
    );
    let credential = Credential::new(cli.api_key.clone());
    let host = HostContext::new("intent-auth-cli");

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = IntentReader::new(file);
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());

    for intent_result in reader.intents() {
        let intent = match intent_result {
            Ok(intent) => intent,
            Err(e) => {
                eprintln!("Error reading payment intent: {}", e);
                continue;
            }
        };
        let intent_id = intent_label(&intent);

        api.set_intent(intent.clone()).await;
        let (tx, mut rx) = oneshot::channel();
        let callback: AuthCallback = Box::new(move |result| {
            let _ = tx.send(result);
        });

        let started = if cli.confirm {
            api.on_confirm(intent.clone()).await;
            match intent.client_secret() {
                Some(client_secret) => {
                    let params =
                        ConfirmPaymentIntentParams::create(client_secret, cli.return_url.clone());
                    controller
                        .start_confirm_and_auth(&host, params, &credential, callback)
                        .await
                }
                None => Err(AuthError::InvalidRequest(
                    "payment intent has no client_secret to confirm with".to_string(),
                )),
            }
        } else {
            controller
                .start_auth(&host, intent.clone(), &credential, callback)
                .await
        };
        if let Err(e) = started {
            writer
                .write_record(&OutcomeRecord::from_error(&intent_id, &e))
                .into_diagnostic()?;
            continue;
        }

        let result = loop {
            tokio::select! {
                delivered = &mut rx => break delivered,
                Some(flow) = flows.recv() => {
                    respond(&cli, &controller, &api, &credential, &intent, flow).await;
                }
            }
        };

        let record = match result {
            Ok(result) => OutcomeRecord::from_result(&intent_id, &result),
            Err(_) => OutcomeRecord::from_error(
                &intent_id,
                &AuthError::InvalidRequest("attempt ended without an outcome".to_string()),
            ),
        };
        writer.write_record(&record).into_diagnostic()?;
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}

/// Plays the host's part for one launched flow: settles the intent on the
/// server and reports the completion back to the controller.
async fn respond(
    cli: &Cli,
    controller: &PaymentAuthController,
    api: &InMemoryIntentApi,
    credential: &Credential,
    intent: &PaymentIntent,
    flow: LaunchedFlow,
) {
    debug!(?flow, "simulated host received flow");
    if let Some(settled) = settle(intent, &cli.final_status) {
        api.set_intent(settled).await;
    }

    let client_secret = flow.client_secret();
    let completion = match cli.completion {
        Completion::Completed => FlowCompletion::completed(client_secret),
        Completion::Canceled => FlowCompletion::canceled(client_secret),
        Completion::Failed => FlowCompletion::failed(client_secret, "challenge was not completed"),
    };

    if !controller.should_handle_result(flow.request_code(), RESULT_OK, Some(&completion)) {
        warn!(request_code = flow.request_code(), "result ignored by controller");
        return;
    }
    let on_miss: AuthCallback = Box::new(|result: AuthResult<PaymentAuthResult>| {
        if let Err(e) = result {
            warn!(error = %e, "completion did not match an attempt");
        }
    });
    controller.handle_result(completion, credential, on_miss).await;
}

/// The snapshot the server holds once the flow finished.
fn settle(intent: &PaymentIntent, final_status: &str) -> Option<PaymentIntent> {
    let mut json = intent.to_json();
    let object = json.as_object_mut()?;
    object.insert("status".to_string(), Value::String(final_status.to_string()));
    object.remove("next_action");
    PaymentIntent::from_json(&json)
}

fn intent_label(intent: &PaymentIntent) -> String {
    intent
        .id()
        .or_else(|| {
            intent
                .client_secret()
                .map(PaymentIntent::parse_id_from_client_secret)
        })
        .unwrap_or("<unknown>")
        .to_string()
}
