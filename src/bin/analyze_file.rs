use anyhow::{bail, Context};
use originscan_lib::api::analyze_upload;
use originscan_lib::init_console_only_logging;
use originscan_lib::models::ReportKind;
use originscan_lib::services::config_store::UploadConfig;
use originscan_lib::services::detection::SystemStamper;
use originscan_lib::services::report_render::render_report;
use tracing_subscriber::EnvFilter;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin analyze_file -- <path.txt|.pdf|.docx> [--out <json_path>] [--report similarity|ai]\n\nNotes:\n  - `--report` prints the rendered report; combined with `--out` it is written next to the JSON as <out>.txt.\n  - RUST_LOG controls log verbosity (default warn)."
        );
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    init_console_only_logging(env_filter);

    let path = args[1].clone();
    let out_path = parse_arg_value(&args, "--out");
    let report_kind = match parse_arg_value(&args, "--report") {
        Some(v) => match ReportKind::parse(&v) {
            Some(kind) => Some(kind),
            None => bail!("unknown report kind '{}' (expected similarity or ai)", v),
        },
        None => None,
    };

    let bytes = std::fs::read(&path).with_context(|| format!("read file failed: {}", path))?;
    let file_name = std::path::Path::new(&path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "input.txt".to_string());

    let report = analyze_upload(&file_name, &bytes, &UploadConfig::default(), &SystemStamper)?;

    println!("File: {}", path);
    println!("Submission: {} ({})", report.submission_id, report.submission_date);
    println!(
        "Words: {}  Sentences: {}  Characters: {}",
        report.word_count, report.sentence_count, report.character_count
    );
    println!("AI score: {}% ({})", report.ai_score, report.ai_label.text);
    println!("AI paraphrased: {}%", report.ai_paraphrased_score);
    println!("Similarity: {}% ({})", report.plag_score, report.plag_label.text);
    println!("Readability: {} ({})", report.readability, report.grade_level);
    if !report.flagged_phrases.is_empty() {
        println!("Flagged phrases: {}", report.flagged_phrases.join(", "));
    }

    println!("\nMatched sources:");
    for s in &report.matched_sources {
        println!("  {:>3}%  {} ({})", s.pct, s.name, s.url);
    }

    println!("\nHighlights (first 10):");
    for (i, hs) in report.highlighted_sentences.iter().take(10).enumerate() {
        let preview: String = hs.text.chars().take(80).collect();
        println!("  [{}] {}% {} | {}", i, hs.match_pct, hs.source, preview);
    }

    let rendered = report_kind.map(|kind| render_report(kind, &report));

    if let Some(out) = out_path {
        let json = serde_json::to_string_pretty(&report).context("serialize report failed")?;
        std::fs::write(&out, json).with_context(|| format!("write report json failed: {}", out))?;
        println!("\nWrote JSON: {}", out);
        if let Some(body) = &rendered {
            let txt_path = format!("{}.txt", out);
            std::fs::write(&txt_path, body).with_context(|| format!("write rendered report failed: {}", txt_path))?;
            println!("Wrote report: {}", txt_path);
        }
    } else if let Some(body) = &rendered {
        println!("\n{}", body);
    }

    Ok(())
}
