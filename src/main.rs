use std::fmt::{Debug, Display};
use std::sync::Arc;

use scholarship_hub::core::{get_subscriber, init_subscriber, AppConfig};
use scholarship_hub::models::LoginForm;
use scholarship_hub::routing::NavigationOutcome;
use scholarship_hub::scholarship_portal::ScholarshipPortal;
use secrecy::Secret;
use tokio::task::JoinError;

use colored::*;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let file_appender = tracing_appender::rolling::daily("/var/tmp/log/scholarship_hub", "portal");

    let subscriber = get_subscriber("scholarship_hub".into(), "info".into(), file_appender);
    init_subscriber(subscriber);

    let config = AppConfig::new()?;
    let portal = Arc::new(ScholarshipPortal::build(config)?);

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let session = tokio::spawn(open_page(portal.clone(), path.clone()));

    println!("{}", "-----------------------------------------".green());
    println!("🎓 Scholarship portal resolving {}", path.bold());
    println!("{}", "-----------------------------------------".green());

    tokio::select! {
        o = session => {report_exit("portal session", o);}
    }
    Ok(())
}

async fn open_page(portal: Arc<ScholarshipPortal>, path: String) -> Result<(), anyhow::Error> {
    let refresh_token = std::env::var("SCHOLARSHIP_HUB_REFRESH_TOKEN").ok().map(Secret::new);
    portal.start(refresh_token).await?;

    if let (Ok(email), Ok(password)) = (
        std::env::var("SCHOLARSHIP_HUB_EMAIL"),
        std::env::var("SCHOLARSHIP_HUB_PASSWORD"),
    ) {
        let form = LoginForm {
            email,
            password: Secret::new(password),
        };
        let user = portal.sign_in(&form).await?;
        println!("{} {}", "Signed in as".green(), user.email.unwrap_or(user.uid));
    }

    match portal.open(&path).await {
        NavigationOutcome::Render(route) => println!(
            "{} {:?} in the {:?} layout (role: {})",
            "Rendering".green(),
            route.page,
            route.layout,
            route.role.map(|r| r.to_string()).unwrap_or_else(|| "-".into())
        ),
        NavigationOutcome::Loading => println!("{}", "Still loading the session".yellow()),
        NavigationOutcome::Redirect(location) => println!(
            "{} {} (from {})",
            "Redirected to".yellow(),
            location.path,
            location.from.unwrap_or_else(|| "-".into())
        ),
        NavigationOutcome::NotFound => println!("{} {}", "No page at".red(), path),
    }
    Ok(())
}

fn report_exit(task_name: &str, outcome: Result<Result<(), impl Debug + Display>, JoinError>) {
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("{} has exited", task_name)
        }
        Ok(Err(e)) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} failed",
                task_name
            );
            eprintln!("{} {}", "Failed:".red(), e);
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{}' task failed to complete",
                task_name
            )
        }
    }
}
