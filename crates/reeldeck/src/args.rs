use std::collections::BTreeSet;

use tracing::error;

use crate::FeedConfig;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Args {
    pub datapath: Option<String>,
    pub endpoint: Option<String>,
    pub page_size: Option<u32>,
    pub debug: bool,
    pub mobile: bool,
}

impl Args {
    // parse arguments, return set of unrecognized args
    pub fn parse(args: &[String]) -> (Self, BTreeSet<String>) {
        let mut unrecognized_args = BTreeSet::new();
        let mut res = Args::default();

        // skip the binary name
        let mut i = 1;
        let len = args.len();
        while i < len {
            let arg = &args[i];

            if arg == "--debug" {
                res.debug = true;
            } else if arg == "--mobile" {
                res.mobile = true;
            } else if arg == "--datapath" {
                i += 1;
                let Some(datapath) = args.get(i) else {
                    error!("datapath argument missing?");
                    continue;
                };
                res.datapath = Some(datapath.clone());
            } else if arg == "--endpoint" {
                i += 1;
                let Some(endpoint) = args.get(i) else {
                    error!("endpoint argument missing?");
                    continue;
                };
                res.endpoint = Some(endpoint.clone());
            } else if arg == "--page-size" {
                i += 1;
                let Some(size) = args.get(i) else {
                    error!("page-size argument missing?");
                    continue;
                };
                match size.parse::<u32>() {
                    Ok(size) if size > 0 => res.page_size = Some(size),
                    _ => error!("invalid page size '{size}', expected a positive integer"),
                }
            } else {
                unrecognized_args.insert(arg.clone());
            }

            i += 1;
        }

        (res, unrecognized_args)
    }

    /// Command line values take precedence over the config file.
    pub fn apply(&self, config: &mut FeedConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.api_base = endpoint.clone();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("reeldeck")
            .chain(args.iter().copied())
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn parses_known_flags() {
        let (args, unknown) = Args::parse(&argv(&[
            "--debug",
            "--datapath",
            "/tmp/rd",
            "--endpoint",
            "https://api.example.com",
            "--page-size",
            "10",
        ]));

        assert!(args.debug);
        assert!(!args.mobile);
        assert_eq!(args.datapath.as_deref(), Some("/tmp/rd"));
        assert_eq!(args.endpoint.as_deref(), Some("https://api.example.com"));
        assert_eq!(args.page_size, Some(10));
        assert!(unknown.is_empty());
    }

    #[test]
    fn collects_unrecognized() {
        let (args, unknown) = Args::parse(&argv(&["--mobile", "--wat", "extra"]));
        assert!(args.mobile);
        assert!(unknown.contains("--wat"));
        assert!(unknown.contains("extra"));
    }

    #[test]
    fn rejects_bad_page_size() {
        let (args, _) = Args::parse(&argv(&["--page-size", "0"]));
        assert_eq!(args.page_size, None);

        let (args, _) = Args::parse(&argv(&["--page-size", "lots"]));
        assert_eq!(args.page_size, None);
    }

    #[test]
    fn apply_overrides_config() {
        let (args, _) = Args::parse(&argv(&["--endpoint", "http://localhost:9000"]));
        let mut config = FeedConfig::default();
        args.apply(&mut config);
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.page_size, FeedConfig::default().page_size);
    }
}
