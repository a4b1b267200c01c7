use lenslink::{build_rocket, init_tracing, Config};
use rocket::{Build, Rocket};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let config = Config::load().expect("Failed to load configuration");
    init_tracing(&config.logging.level, config.logging.json_format);

    build_rocket(config)
}
