use strum::EnumString;

pub const ENV_KEY: &str = "ENV";

#[derive(Default, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match std::env::var(ENV_KEY) {
        Err(_) => default_env,
        Ok(v) => v.parse().unwrap_or(default_env),
    }
}
