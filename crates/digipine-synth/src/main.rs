use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use digipine_synth::catalog::{resolve_catalog, ReferenceCatalog};
use digipine_synth::checkout::{format_card_number, CheckoutFlow, PaymentMode};
use digipine_synth::cli::{validate_label, Args, Command, ListTarget, LogFormat, OutputFormat};
use digipine_synth::data::bias::apply_bias;
use digipine_synth::data::ranges;
use digipine_synth::data::snapshot::TimelineMetric;
use digipine_synth::data::synth::{generate_on, synthesize_on, try_synthesize_on};
use digipine_synth::error::SynthResult;
use digipine_synth::markers::map_view;
use digipine_synth::output::write_report;
use digipine_synth::render::{JsonRenderer, Renderer, TextRenderer};
use digipine_synth::results::{RunContext, SnapshotReport, SweepReport, SCHEMA_VERSION};
use digipine_synth::runner::{run_sweep, SweepOptions};
use digipine_synth::selection::TimeWindow;

fn main() -> SynthResult<ExitCode> {
    let args = Args::parse();
    init_logging(&args.log_level, args.log_format);

    let catalog = resolve_catalog(args.catalog.as_deref())?;
    let catalog_source = args
        .catalog
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "builtin".to_string());

    match args.command {
        Command::List { target } => print_listing(&catalog, target),
        Command::Generate {
            selection,
            strict,
            raw,
            format,
            metric,
            write,
        } => {
            let key = selection.key();
            let today = selection.date.unwrap_or_else(today);
            let snapshot = if strict {
                try_synthesize_on(&key, &catalog, today)?
            } else {
                synthesize_on(&key, &catalog, today)
            };
            let snapshot = if raw {
                snapshot
            } else {
                apply_bias(snapshot, &key, &catalog)
            };

            let rendered = match format {
                OutputFormat::Json => JsonRenderer { pretty: true }.render(&snapshot)?,
                OutputFormat::Text => {
                    TextRenderer::new(&catalog, TimelineMetric::parse_lenient(&metric))
                        .render(&snapshot)?
                }
            };
            println!("{rendered}");

            if write {
                let report = SnapshotReport {
                    schema_version: SCHEMA_VERSION,
                    context: RunContext::new(&args.label, &catalog_source, today),
                    selection: key.clone(),
                    fingerprint: snapshot.fingerprint()?,
                    map: Some(map_view(&snapshot, &key, &catalog)),
                    snapshot,
                };
                let path = write_report(&args.output_dir, &args.label, &key.slug(), &report)?;
                eprintln!("wrote snapshot: {}", path.display());
            }
        }
        Command::Markers { selection } => {
            let key = selection.key();
            let today = selection.date.unwrap_or_else(today);
            let snapshot = generate_on(&key, &catalog, today);
            let view = map_view(&snapshot, &key, &catalog);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Sweep {
            count,
            seed,
            iterations,
            date,
            write,
        } => {
            let today = date.unwrap_or_else(today);
            let options = SweepOptions {
                count,
                seed,
                iterations,
                today,
            };
            let cases = run_sweep(&catalog, &options)?;
            let report = SweepReport {
                schema_version: SCHEMA_VERSION,
                context: RunContext::new(&args.label, &catalog_source, today),
                seed,
                cases,
            };

            let failed: Vec<_> = report.failed_cases().collect();
            for case in &failed {
                let message = case
                    .failure
                    .as_ref()
                    .map(|f| f.message.as_str())
                    .unwrap_or("unknown failure");
                println!("FAIL {}: {message}", case.case);
            }
            println!(
                "sweep: {} cases, {} failed (seed={seed})",
                report.cases.len(),
                failed.len()
            );
            let any_failed = !failed.is_empty();

            if write {
                let path =
                    write_report(&args.output_dir, &args.label, &format!("sweep-{seed}"), &report)?;
                println!("wrote sweep report: {}", path.display());
            }
            if any_failed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Checkout {
            plan,
            amount,
            mode,
            card_number,
        } => {
            let mut flow = CheckoutFlow::default();
            flow.open(&plan, amount);
            println!("screen: {:?}", flow.screen());
            if amount > 0 {
                let mode = PaymentMode::parse(&mode)?;
                flow.choose_mode(mode)?;
                println!("screen: {} ({} fields)", mode.title(), mode.fields().len());
                if let Some(number) = card_number.as_deref() {
                    println!("card number: {}", format_card_number(number));
                }
                flow.submit()?;
                println!("screen: {:?}", flow.screen());
                println!("{}", flow.complete()?);
            }
            flow.close();
        }
        Command::Doctor => {
            println!("digipine-synth doctor");
            println!("catalog={catalog_source}");
            println!("products={}", catalog.products().len());
            println!(
                "concrete_regions={}",
                catalog.concrete_regions().count()
            );
            println!("platforms={}", catalog.platforms().len());
            println!("default_product={}", catalog.default_product().id);
            println!("output_dir={}", args.output_dir.display());
            let label_state = match validate_label(&args.label) {
                Ok(()) => "ok".to_string(),
                Err(error) => error.to_string(),
            };
            println!("label={} ({label_state})", args.label);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn print_listing(catalog: &ReferenceCatalog, target: ListTarget) {
    let all = target == ListTarget::All;
    if all || target == ListTarget::Products {
        println!("products:");
        for product in catalog.products() {
            println!("- {} ({})", product.id, product.label);
        }
    }
    if all || target == ListTarget::Regions {
        println!("regions:");
        for region in catalog.regions() {
            println!("- {} ({})", region.id, region.label);
        }
    }
    if all || target == ListTarget::Platforms {
        println!("platforms:");
        for platform in catalog.platforms() {
            println!("- {} ({})", platform.id, platform.label);
        }
    }
    if all || target == ListTarget::Windows {
        println!("windows:");
        for window in TimeWindow::ALL {
            println!("- {}", window.as_str());
        }
    }
    if all || target == ListTarget::Ranges {
        println!("ranges:");
        for (name, spec) in ranges::table() {
            println!(
                "- {name}: {}..{} ({:?})",
                spec.min,
                spec.max(),
                spec.rounding
            );
        }
    }
}
