use clap::Parser;
use pledge_backends::utils::{logger, validation::Validate};
use pledge_backends::{
    AppConfig, BufferDispatcher, CliArgs, Environment, OutgoingEmail, SubscribeRequest,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting pledge-smoke");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    if let Err(e) = args.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Could not load {}: {}", args.config, e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // Buffer deferred work so we can run it before the process exits;
    // a web server would use SpawnDispatcher instead.
    let dispatcher = Arc::new(BufferDispatcher::new());
    let env = match Environment::from_config(&config, dispatcher.clone()) {
        Ok(env) => env,
        Err(e) => {
            tracing::error!("❌ Backend selection failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Environment '{}' ready (publishable key {})",
        env.app_name(),
        env.stripe_publishable_key()
    );

    match run_pledge(&env, &args).await {
        Ok(charge_id) => {
            tracing::info!("✅ Pledge completed, charge {}", charge_id);
            println!("✅ Pledge completed: charge {}", charge_id);
        }
        Err(e) if e.is_payment() => {
            // the one failure a donor is supposed to see
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!("❌ Pledge failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    let results = dispatcher.drain().await;
    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    tracing::info!(
        "Deferred tasks run: {} ({} failed)",
        results.len(),
        failed
    );
    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

async fn run_pledge(
    env: &Environment,
    args: &CliArgs,
) -> pledge_backends::Result<String> {
    let payment = env.payment();
    let customer_id = payment.create_customer(&args.email, &args.card_token).await?;
    tracing::info!("Customer created: {}", customer_id);

    let charge_id = payment.charge(&customer_id, args.amount_cents).await?;

    env.subscriber()
        .subscribe(SubscribeRequest {
            email: args.email.clone(),
            first_name: args.first_name.clone(),
            last_name: args.last_name.clone(),
            amount_cents: Some(args.amount_cents),
            request_ip: "127.0.0.1".to_string(),
            source: Some("pledge-smoke".to_string()),
            ..Default::default()
        })
        .await?;

    env.mail()
        .send(OutgoingEmail::new(
            args.email.clone(),
            "Thank you for your pledge".to_string(),
            format!(
                "Thanks, {}! Your pledge of ${:.2} went through.",
                args.first_name,
                args.amount_cents as f64 / 100.0
            ),
            format!(
                "<p>Thanks, {}! Your pledge of <b>${:.2}</b> went through.</p>",
                args.first_name,
                args.amount_cents as f64 / 100.0
            ),
        ))
        .await?;

    Ok(charge_id)
}
