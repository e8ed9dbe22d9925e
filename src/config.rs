use std::env;

#[derive(Debug, Clone)]
pub struct EmitterConfig {
    pub host: String,
    pub port: u16,
}

impl EmitterConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let host =
            env::var("EMITTER_HOST").map_err(|_| "EMITTER_HOST environment variable not set")?;

        let port = env::var("EMITTER_PORT")
            .map_err(|_| "EMITTER_PORT environment variable not set")?
            .parse::<u16>()
            .map_err(|e| format!("EMITTER_PORT is not a valid port number: {}", e))?;

        Ok(EmitterConfig { host, port })
    }
}
