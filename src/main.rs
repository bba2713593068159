//! SkillSpark - Main Entry Point
//!
//! Starts the web API server for the learning roadmap engine.

use skillspark::api::run_server;
use skillspark::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    println!("╔════════════════════════════════════════════════╗");
    println!("║   SkillSpark - Learning Roadmap Engine         ║");
    println!("║   Choose → Learn → Pass → Unlock               ║");
    println!("╚════════════════════════════════════════════════╝");
    println!();

    run_server(AppConfig::from_env()).await
}
