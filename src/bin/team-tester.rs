//! Team randomization tester
//!
//! Developer tool that exercises the team randomizer without a gateway
//! connection: runs many shuffle trials to show the per-member Team 1
//! distribution, then performs one full randomize against the in-memory
//! platform and prints the resulting rosters.

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use team_rooms::metrics::MetricsCollector;
use team_rooms::platform::{InMemoryPlatform, VoicePlatform};
use team_rooms::registry::ChannelRegistry;
use team_rooms::rooms::{shuffle_members, TeamRandomizer, REQUIRED_PLAYERS, TEAM_SIZE};
use team_rooms::types::{CategoryId, CommandIssuer, RandomizeOutcome, UserId};

/// Exercise the team randomizer against the in-memory platform
#[derive(Parser)]
#[command(name = "team-tester", version, about = "Team randomization tester")]
struct Args {
    /// Number of shuffle trials for the distribution table
    #[arg(short, long, default_value_t = 10_000)]
    trials: usize,

    /// RNG seed for reproducible trials
    #[arg(short, long)]
    seed: Option<u64>,
}

fn print_distribution(trials: usize, seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut team_one_counts = [0usize; REQUIRED_PLAYERS];
    for _ in 0..trials {
        let mut members: Vec<usize> = (0..REQUIRED_PLAYERS).collect();
        shuffle_members(&mut members, &mut rng);
        for member in &members[..TEAM_SIZE] {
            team_one_counts[*member] += 1;
        }
    }

    println!("Team 1 membership over {} trials (expected ~50.0%):", trials);
    for (member, count) in team_one_counts.iter().enumerate() {
        let frequency = 100.0 * *count as f64 / trials as f64;
        println!("  player {:>2}: {:>6} ({:.1}%)", member, count, frequency);
    }
}

async fn run_full_randomize() -> Result<()> {
    let platform = InMemoryPlatform::new();
    let registry = Arc::new(ChannelRegistry::new());
    let metrics = Arc::new(MetricsCollector::new()?);
    let randomizer = TeamRandomizer::new(registry.clone(), metrics);

    let source = platform.add_channel("scrims", Some(CategoryId(1)));
    for player in 1..=REQUIRED_PLAYERS as u64 {
        platform.place_member(UserId(player), source);
    }

    let issuer = CommandIssuer {
        user: UserId(1),
        holds_required_role: true,
        voice_channel: Some(source),
    };

    match randomizer.randomize(&platform, &issuer).await? {
        RandomizeOutcome::TeamsCreated {
            team_one_channel,
            team_two_channel,
        } => {
            println!("\nFull randomize against the in-memory platform:");
            for (label, channel) in [("Team 1", team_one_channel), ("Team 2", team_two_channel)] {
                let roster = platform.voice_channel_members(channel).await?;
                let players: Vec<String> = roster.iter().map(|u| u.to_string()).collect();
                println!("  {}: players [{}]", label, players.join(", "));
            }
            println!("  registry now tracks {} channels", registry.len());
        }
        RandomizeOutcome::Rejected(rejection) => {
            println!("Unexpected rejection: {:?}", rejection);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    print_distribution(args.trials, args.seed);
    run_full_randomize().await?;

    Ok(())
}
