use tracing_subscriber::EnvFilter;

/// Info for the service library and both binaries, warn for everything else.
const DEFAULT_FILTER: &str = "mix_service=info,mix_report=info,warn";

/// Install the fmt subscriber. `RUST_LOG` overrides [`DEFAULT_FILTER`].
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::Directive;

    #[test]
    fn default_filter_parses() {
        for directive in DEFAULT_FILTER.split(',') {
            assert!(directive.parse::<Directive>().is_ok(), "{directive}");
        }
    }

    #[test]
    fn default_filter_covers_report_binary() {
        let directives: Vec<&str> = DEFAULT_FILTER.split(',').collect();
        assert!(directives.contains(&"mix_service=info"));
        assert!(directives.contains(&"mix_report=info"));
    }
}
