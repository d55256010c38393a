//! Shared helpers used by every crate in the workspace: logging setup and
//! small response types that are not tied to the record store.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
        assert!(h.time.ends_with('Z'));
    }

    #[test]
    fn log_format_parses_known_values() {
        use utils::logging::LogFormat;
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("pretty-please".parse::<LogFormat>().is_err());
    }
}
