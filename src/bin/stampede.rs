use campus_events::client::{CampusClient, EventDraft};
use campus_events::domain::models::{event::EventCategory, user::PrincipalRole};
use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use uuid::Uuid;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[tokio::main]
async fn main() {
    let base_url = std::env::var("STAMPEDE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let claimants: usize = env_or("STAMPEDE_CLAIMANTS", 50);
    let capacity: i32 = env_or("STAMPEDE_CAPACITY", 10);
    let rps: u32 = env_or("STAMPEDE_RPS", 500);

    println!("{}", "Starting registration stampede".bold().green());
    println!("Target URL: {}", base_url);
    println!("Claimants: {}  Capacity: {}  Rate: {}/s", claimants, capacity, rps);

    if reqwest::get(format!("{}/health", base_url)).await.is_err() {
        eprintln!("{}", format!("Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        std::process::exit(2);
    }

    println!("\n{}", "Setting up organizer and event...".yellow());
    let run_id = Uuid::new_v4().simple().to_string();

    let mut organizer = CampusClient::new(&base_url).expect("Failed to build client");
    organizer
        .register("Stampede Organizer", &format!("organizer-{}@stampede.local", run_id), "stampede-pass", PrincipalRole::Faculty, &format!("ORG-{}", run_id))
        .await
        .expect("Failed to register organizer");

    let event = organizer
        .create_event(&EventDraft {
            title: format!("Stampede {}", &run_id[..8]),
            description: "Concurrent registration probe".into(),
            category: EventCategory::Technical,
            subcategory: "load".into(),
            date: (Utc::now() + ChronoDuration::days(30)).date_naive(),
            time: "10:00".into(),
            location: "Main Hall".into(),
            price: 0.0,
            capacity,
            skills: vec![],
        })
        .await
        .expect("Failed to create event");

    println!("\n{}", format!("Registering {} claimants...", claimants).yellow());
    let mut clients = Vec::with_capacity(claimants);
    for i in 0..claimants {
        let mut client = CampusClient::new(&base_url).expect("Failed to build client");
        client
            .register(&format!("Claimant {}", i), &format!("claimant-{}-{}@stampede.local", i, run_id), "stampede-pass", PrincipalRole::Student, &format!("STU-{}-{}", i, run_id))
            .await
            .expect("Failed to register claimant");
        clients.push(client);
    }

    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps.max(1)).expect("rate is non-zero"))
    ));

    println!("{}", "Firing registrations...".yellow());
    let mut set = JoinSet::new();
    for client in clients {
        let limiter = limiter.clone();
        let event_id = event.id.clone();
        set.spawn(async move {
            limiter.until_ready().await;
            let started = Instant::now();
            let outcome = client.register_for_event(&event_id).await;
            (started.elapsed(), outcome.map(|_| ()).map_err(|e| e.kind().unwrap_or("TRANSPORT").to_string()))
        });
    }

    let mut histogram = Histogram::<u64>::new(3).expect("valid histogram precision");
    let mut accepted = 0usize;
    let mut at_capacity = 0usize;
    let mut other = Vec::new();

    while let Some(joined) = set.join_next().await {
        let Ok((latency, outcome)) = joined else {
            other.push("PANIC".to_string());
            continue;
        };
        let _ = histogram.record(latency.as_micros() as u64);
        match outcome {
            Ok(()) => accepted += 1,
            Err(kind) if kind == "AT_CAPACITY" => at_capacity += 1,
            Err(kind) => other.push(kind),
        }
    }

    let final_event = organizer.get_event(&event.id).await.expect("Failed to re-read event");

    println!("\n{}", "=".repeat(60));
    println!("{:<20} | {}", "Accepted", accepted);
    println!("{:<20} | {}", "AT_CAPACITY", at_capacity);
    println!("{:<20} | {}", "Other failures", other.len());
    println!("{:<20} | {}", "Final attendees", final_event.attendees.len());
    println!("{:<20} | {:.2}", "Mean (ms)", histogram.mean() / 1000.0);
    println!("{:<20} | {:.2}", "P99 (ms)", histogram.value_at_quantile(0.99) as f64 / 1000.0);
    println!("{}", "=".repeat(60));

    let expected = (capacity as usize).min(claimants);
    let holds = accepted == expected
        && at_capacity == claimants - expected
        && other.is_empty()
        && final_event.attendees.len() == expected;

    if holds {
        println!("{}", "Capacity invariant held.".green().bold());
    } else {
        eprintln!("{}", format!("Capacity invariant VIOLATED (unexpected kinds: {:?})", other).red().bold());
        std::process::exit(1);
    }
}
