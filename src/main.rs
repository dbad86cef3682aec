use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use html_xliff::config::{Cli, Command, ConversionConfig};
use html_xliff::stats::{format_duration, print_performance_stats, ConversionStats};
use html_xliff::utils::{
    collect_html_files, generate_output_path, generate_output_path_in_dir, init_logging,
    original_name, validate_html_file, validate_xliff_file, XLIFF_EXTENSION,
};
use html_xliff::{
    html_to_xliff, merge, parse_html, read_xliff, serialize_html, write_xliff, xliff_to_html,
    MergeReport,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

/// extract子命令的选项
struct ExtractOptions<'a> {
    source_lang: &'a str,
    target_lang: Option<&'a str>,
    key_attr: &'a str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    init_logging(cli.verbose, cli.quiet);

    let total_start = Instant::now();

    match run(&cli) {
        Ok(stats) => {
            let total_duration = total_start.elapsed();

            if !cli.quiet {
                info!("✅ 完成！总耗时: {}", format_duration(total_duration));
            }

            if cli.stats {
                print_performance_stats(&stats, total_duration);
            }
        }
        Err(e) => {
            error!("❌ 处理失败: {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<ConversionStats> {
    match &cli.command {
        Command::Extract {
            input,
            output,
            source_lang,
            target_lang,
            key_attr,
        } => {
            let options = ExtractOptions {
                source_lang,
                target_lang: target_lang.as_deref(),
                key_attr,
            };
            if input.is_dir() {
                extract_dir(input, output.as_deref(), &options)
            } else {
                validate_html_file(input)?;
                let output_path = generate_output_path(input, output.as_deref(), XLIFF_EXTENSION);
                extract_file(input, &output_path, &options)
            }
        }
        Command::Render {
            input,
            output,
            key_attr,
        } => render_file(input, output.as_deref(), key_attr),
        Command::Merge {
            old,
            fresh,
            output,
            json,
            date,
        } => {
            let date = match date {
                Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .with_context(|| format!("日期格式应为YYYY-MM-DD: {}", date))?,
                None => Local::now().date_naive(),
            };
            merge_files(old, fresh, output.as_deref().unwrap_or(old), *json, date)
        }
    }
}

fn extract_dir(
    input: &Path,
    output: Option<&Path>,
    options: &ExtractOptions<'_>,
) -> Result<ConversionStats> {
    let files = collect_html_files(input)?;
    info!("📂 在 {} 中找到 {} 个HTML文件", input.display(), files.len());

    let mut total = ConversionStats::default();
    for file in &files {
        let output_path = generate_output_path_in_dir(file, input, output, XLIFF_EXTENSION);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建目录失败: {}", parent.display()))?;
        }
        let stats = extract_file(file, &output_path, options)?;
        total.absorb(&stats);
    }
    Ok(total)
}

fn extract_file(
    input: &Path,
    output_path: &Path,
    options: &ExtractOptions<'_>,
) -> Result<ConversionStats> {
    let mut stats = ConversionStats::default();

    let mut config = ConversionConfig::new()
        .source_language(options.source_lang)
        .key_attribute(options.key_attr)
        .original(&original_name(input));
    if let Some(target) = options.target_lang {
        config = config.target_language(target);
    }
    config.validate().context("配置无效")?;

    let read_start = Instant::now();
    let html = fs::read_to_string(input)
        .with_context(|| format!("读取文件失败: {}", input.display()))?;
    stats.file_read_time = read_start.elapsed();
    stats.input_size = html.len();

    let convert_start = Instant::now();
    let root = parse_html(&html).with_context(|| format!("HTML解析失败: {}", input.display()))?;
    let doc = html_to_xliff(&root, &config);
    let xliff = write_xliff(&doc).context("XLIFF序列化失败")?;
    stats.conversion_time = convert_start.elapsed();
    stats.count_document(&doc);

    let write_start = Instant::now();
    fs::write(output_path, &xliff)
        .with_context(|| format!("写入文件失败: {}", output_path.display()))?;
    stats.file_write_time = write_start.elapsed();
    stats.output_size = xliff.len();
    stats.files_processed = 1;

    info!(
        "📄 {} → {} ({} 个翻译单元)",
        input.display(),
        output_path.display(),
        stats.trans_units
    );
    Ok(stats)
}

fn render_file(input: &Path, output: Option<&Path>, key_attr: &str) -> Result<ConversionStats> {
    validate_xliff_file(input)?;
    let mut stats = ConversionStats::default();

    let read_start = Instant::now();
    let content = fs::read_to_string(input)
        .with_context(|| format!("读取文件失败: {}", input.display()))?;
    stats.file_read_time = read_start.elapsed();
    stats.input_size = content.len();

    let convert_start = Instant::now();
    let doc = read_xliff(&content).with_context(|| format!("XLIFF解析失败: {}", input.display()))?;
    let config = ConversionConfig::new().key_attribute(key_attr);
    let root = xliff_to_html(&doc, &config).context("XLIFF渲染失败")?;
    let html = serialize_html(&root)?;
    stats.conversion_time = convert_start.elapsed();
    stats.count_document(&doc);

    // 默认输出 page.<lang>.html，不覆盖原始HTML
    let language = doc
        .target_language
        .as_deref()
        .unwrap_or(&doc.source_language);
    let output_path =
        generate_output_path(input, output, &format!("{}.html", language));

    let write_start = Instant::now();
    fs::write(&output_path, &html)
        .with_context(|| format!("写入文件失败: {}", output_path.display()))?;
    stats.file_write_time = write_start.elapsed();
    stats.output_size = html.len();
    stats.files_processed = 1;

    info!("📄 {} → {}", input.display(), output_path.display());
    Ok(stats)
}

fn merge_files(
    old_path: &Path,
    fresh_path: &Path,
    output_path: &Path,
    as_json: bool,
    date: NaiveDate,
) -> Result<ConversionStats> {
    validate_xliff_file(old_path)?;
    validate_xliff_file(fresh_path)?;
    let mut stats = ConversionStats::default();

    let read_start = Instant::now();
    let old_content = fs::read_to_string(old_path)
        .with_context(|| format!("读取文件失败: {}", old_path.display()))?;
    let fresh_content = fs::read_to_string(fresh_path)
        .with_context(|| format!("读取文件失败: {}", fresh_path.display()))?;
    stats.file_read_time = read_start.elapsed();
    stats.input_size = old_content.len() + fresh_content.len();

    let convert_start = Instant::now();
    let mut old = read_xliff(&old_content)
        .with_context(|| format!("XLIFF解析失败: {}", old_path.display()))?;
    let fresh = read_xliff(&fresh_content)
        .with_context(|| format!("XLIFF解析失败: {}", fresh_path.display()))?;
    let (merged, report) = merge(&mut old, &fresh, date);
    let xliff = write_xliff(&merged).context("XLIFF序列化失败")?;
    stats.conversion_time = convert_start.elapsed();
    stats.count_document(&merged);

    let write_start = Instant::now();
    fs::write(output_path, &xliff)
        .with_context(|| format!("写入文件失败: {}", output_path.display()))?;
    stats.file_write_time = write_start.elapsed();
    stats.output_size = xliff.len();
    stats.files_processed = 2;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    } else {
        print_merge_report(&report);
    }
    Ok(stats)
}

fn report_json(report: &MergeReport) -> serde_json::Value {
    let renamed: Vec<serde_json::Value> = report
        .renamed
        .iter()
        .map(|(from, to)| json!({ "from": from, "to": to }))
        .collect();
    json!({
        "renamed": renamed,
        "new": report.new_units,
        "changed": report.changed,
        "still_dynamic": report.still_dynamic,
        "likely_obsolete": report.likely_obsolete,
    })
}

fn print_merge_report(report: &MergeReport) {
    println!("\n🔀 合并报告:");
    println!("═══════════════════════════════════════");
    if report.is_unchanged() && report.still_dynamic.is_empty() {
        println!("   没有变化");
        return;
    }
    for (from, to) in &report.renamed {
        println!("   改名: {} → {}", from, to);
    }
    print_ids("新增", &report.new_units);
    print_ids("原文变化", &report.changed);
    print_ids("动态单元 (预期缺席)", &report.still_dynamic);
    print_ids("可能废弃", &report.likely_obsolete);
}

fn print_ids(label: &str, ids: &[String]) {
    if ids.is_empty() {
        return;
    }
    println!("   {} ({}):", label, ids.len());
    for id in ids {
        println!("     - {}", id);
    }
}
