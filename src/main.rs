use std::{env, path::PathBuf, process};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use dashboard_i18n::audit::audit;
use dashboard_i18n::config::{Config, ConfigManager};
use dashboard_i18n::logging::init_logging;
use dashboard_i18n::{
    I18nError, Locale, LocaleSignals, LocaleSource, NavigationTarget, Params, Translator,
    detect_locale, switch_language,
};

#[derive(Parser)]
#[command(name = "dashboard-i18n", version, about = "Resolve dashboard translations and locale routes")]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true, default_value = "dashboard-i18n.json")]
    config: PathBuf,

    /// 覆盖配置中的语言包目录
    #[arg(long, global = true)]
    messages_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a key to its display string
    Translate {
        key: String,
        #[arg(short, long)]
        namespace: Option<String>,
        #[arg(short, long)]
        locale: Option<Locale>,
        /// name=value, repeatable
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Work out which locale a rendering context would use
    Detect {
        #[arg(long)]
        path: Option<String>,
        #[arg(long)]
        browser_language: Option<String>,
        #[arg(long)]
        router_locale: Option<String>,
        #[arg(long, value_enum)]
        source: Option<SourceArg>,
        /// Evaluate as during server rendering, before mount
        #[arg(long)]
        pre_mount: bool,
    },
    /// Compute the navigation target for a locale switch
    Switch {
        #[arg(long)]
        path: String,
        #[arg(long)]
        to: Locale,
    },
    /// Check that every locale has the same keys
    Audit {
        #[arg(long)]
        json: bool,
    },
    /// List every translatable key of a locale
    Keys {
        #[arg(short, long)]
        locale: Option<Locale>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Url,
    Router,
}

impl From<SourceArg> for LocaleSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Url => LocaleSource::Url,
            SourceArg::Router => LocaleSource::Router,
        }
    }
}

fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got `{}`", raw)),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let manager = ConfigManager::load(cli.config.clone())
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let mut config = manager.get_config();
    if let Some(dir) = &cli.messages_dir {
        config.messages_dir = Some(dir.clone());
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    init_logging(&config.logging);
    let policy = config.routing_policy();

    match cli.command {
        Command::Translate { key, namespace, locale, params } => {
            let catalog = config.load_catalog()?;
            let translator = Translator::new(&catalog, namespace.as_deref());
            let locale = locale.unwrap_or(config.default_locale);
            let params: Params = params.into_iter().collect();
            let params = (!params.is_empty()).then_some(&params);
            println!("{}", translator.resolve(locale, &key, params));
        }
        Command::Detect { path, browser_language, router_locale, source, pre_mount } => {
            let signals = LocaleSignals {
                path: path.as_deref(),
                browser_language: browser_language.as_deref(),
                router_locale: router_locale.as_deref(),
                mounted: !pre_mount,
            };
            let source = source.map(LocaleSource::from).unwrap_or(config.locale_source);
            println!("{}", detect_locale(source, &policy, &signals));
        }
        Command::Switch { path, to } => {
            let mut navigate = |target: &NavigationTarget| println!("{}", target.path);
            if switch_language(&policy, &path, to, &mut navigate).is_none() {
                eprintln!("{} is already served in {}", path, to);
            }
        }
        Command::Audit { json } => {
            let catalog = config.load_catalog()?;
            let report = audit(&catalog);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for item in &report.missing {
                    println!(
                        "missing  {:<40} {:<6} {} -> {}",
                        item.key, item.kind, item.present_in, item.missing_in
                    );
                }
                for item in &report.mismatched {
                    println!(
                        "mismatch {:<40} {}={} {}={}",
                        item.key, item.left.0, item.left.1, item.right.0, item.right.1
                    );
                }
                println!("{} keys checked", report.checked_keys);
            }
            if !report.is_clean() {
                bail!(
                    "{} missing and {} mismatched keys",
                    report.missing.len(),
                    report.mismatched.len()
                );
            }
        }
        Command::Keys { locale } => {
            let catalog = config.load_catalog()?;
            let locale = locale.unwrap_or(config.default_locale);
            if let Some(dictionary) = catalog.dictionary(locale) {
                for key in dictionary.keys() {
                    println!("{}", key);
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        // 界面语言取自 LANG，错误信息经语言包本地化
        let locale = env::var("LANG")
            .ok()
            .and_then(|lang| Locale::from_code(&lang))
            .unwrap_or_default();
        match e.downcast_ref::<I18nError>() {
            Some(err) => eprintln!("{}", err.user_friendly_message(locale)),
            None => eprintln!("Error: {:#}", e),
        }
        process::exit(1);
    }
}
