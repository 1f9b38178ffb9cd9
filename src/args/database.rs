use super::types::{Args, StoreKind};
use super::validation::check_rest_url;

impl Args {
    /// Check that the chosen store has what it needs.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the store configuration is incomplete
    pub fn validate(&mut self) -> Result<(), String> {
        if self.password.trim().is_empty() {
            return Err("A login password is required".to_string());
        }
        if self.load_timeout_ms == 0 {
            return Err("The load timeout must be at least 1 ms".to_string());
        }
        if self.write_timeout_ms == 0 {
            return Err("The write timeout must be at least 1 ms".to_string());
        }
        match self.store {
            StoreKind::Postgres => {
                let secrets_locations = ["/secrets/db_password", "/run/secrets/db_password"];

                if self.db_user.as_deref().is_none_or(str::is_empty) {
                    return Err("Postgres user is required".to_string());
                }
                if self.db_host.as_deref().is_none_or(str::is_empty) {
                    return Err("Postgres host is required".to_string());
                }
                if self.db_port.is_none() {
                    return Err("Postgres port is required".to_string());
                }
                match self.db_password.as_deref() {
                    None => return Err("Postgres password is required".to_string()),
                    Some(location) if secrets_locations.contains(&location) => {
                        let contents = std::fs::read_to_string(location).map_err(|e| {
                            format!("Could not read the postgres password from {location}: {e}")
                        })?;
                        self.db_password = Some(contents.trim().to_string());
                    }
                    Some(_) => {}
                }
            }
            StoreKind::Rest => {
                let Some(url) = self.rest_url.as_deref() else {
                    return Err("A store url is required for the rest store".to_string());
                };
                self.rest_url = Some(check_rest_url(url)?);
                if self.rest_key.as_deref().is_none_or(str::is_empty) {
                    return Err("A store api key is required for the rest store".to_string());
                }
            }
            StoreKind::Sqlite | StoreKind::Memory => {}
        }
        Ok(())
    }
}
