use batch_label::adapters::{LocalStorage, TranscriptRecognizer};
use batch_label::config::{CliConfig, Command, LabelSettings, OutputFormat};
use batch_label::core::calculator::{
    format_date, format_date_str, parse_batch_code, parse_reference_date, BatchCodeCalculator,
};
use batch_label::core::clock::{today_in, SystemClock};
use batch_label::core::materials::calculate_raw_materials_from_input;
use batch_label::core::schedule::printing_schedule;
use batch_label::core::store::LabelStore;
use batch_label::core::upload::{
    new_token, normalize_object_key, object_key, upload_key, validate_token,
};
use batch_label::core::verification::LabelVerifier;
use batch_label::domain::model::{DateFormat, DateLabelResult, ImageUpload};
use batch_label::utils::error::{ErrorSeverity, LabelError, Result};
use batch_label::utils::logger;
use chrono::NaiveDate;
use clap::Parser;
use std::time::Duration;

/// 標籤不符時的結束碼，與錯誤結束碼區隔
const EXIT_LABEL_MISMATCH: i32 = 4;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            exit_with(&e);
        }
    };

    match run(&config.command, &settings).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &LabelError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

fn reference_or_today(date: Option<&str>, settings: &LabelSettings) -> Result<NaiveDate> {
    match date {
        Some(raw) => parse_reference_date(raw),
        None => Ok(today_in(&SystemClock, settings.utc_offset_minutes)),
    }
}

fn calculate(calculator: &BatchCodeCalculator, date: Option<&str>) -> Result<DateLabelResult> {
    match date {
        Some(raw) => calculator.calculate_dates_from_input(Some(raw)),
        None => calculator.calculate_today(),
    }
}

async fn run(command: &Command, settings: &LabelSettings) -> Result<i32> {
    match command {
        Command::Calculate { date, format, save } => {
            let calculator = BatchCodeCalculator::from_config(settings)?;
            let result = calculate(&calculator, date.as_deref())?;
            tracing::info!(
                "Calculated batch {} for {}",
                result.batch_code,
                result.reference_date
            );

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => {
                    println!("{}", result.label_text);
                    println!();
                    println!("Batch Code: {}", result.batch_code);
                }
            }

            if let Some(directory) = settings.save_directory(save.as_deref())? {
                let store = LabelStore::new(LocalStorage::new(directory));
                let path = store.save(&result).await?;
                tracing::info!("📁 Label record saved to {}/{}", directory, path);
            }
        }
        Command::Format { date, pattern } => {
            println!("{}", format_date_str(date, pattern)?);
        }
        Command::Schedule { date } => {
            let selected = reference_or_today(date.as_deref(), settings)?;
            let schedule = printing_schedule(selected)?;
            let show = |d: NaiveDate| format_date(d, DateFormat::DotDdMmYy);
            println!("Selected:    {}", show(schedule.selected_date));
            println!("Printing:    {}", show(schedule.printing_date));
            println!("Packing:     {}", show(schedule.packing_date));
            println!("Bag Making:  {}", show(schedule.bag_making_date));
            println!("Filename:    {}", schedule.printing_filename);
        }
        Command::Materials { weight } => {
            let breakdown = calculate_raw_materials_from_input(weight)?;
            for (name, kilograms) in breakdown.rows() {
                println!("{:<14}{:.3} kg", name, kilograms);
            }
        }
        Command::Verify {
            date,
            observed,
            transcript,
        } => {
            let calculator = BatchCodeCalculator::from_config(settings)?;
            let expected = calculate(&calculator, date.as_deref())?;

            let image = match (observed, transcript) {
                (Some(text), _) => text.clone().into_bytes(),
                (None, Some(path)) => tokio::fs::read(path).await?,
                (None, None) => {
                    return Err(LabelError::MissingConfigError {
                        field: "--observed or --transcript".to_string(),
                    })
                }
            };

            let verifier = LabelVerifier::new(TranscriptRecognizer)
                .with_timeout(Duration::from_secs(settings.recognition_timeout_seconds));
            let outcome = verifier.verify(&expected, &image).await?;

            if outcome.matched {
                println!("✅ Label matches");
            } else {
                println!("❌ Label does not match");
                println!("Expected:\n{}", outcome.expected_text);
                println!("Recognized:\n{}", outcome.recognized_text);
                return Ok(EXIT_LABEL_MISMATCH);
            }
        }
        Command::Decode { code } => {
            let parts = parse_batch_code(code)?;
            println!("Day:    {:02}", parts.day);
            println!("Month:  {:02}", parts.month);
            println!("Year:   {:02}", parts.year_two_digit);
            println!("Suffix: {}", parts.suffix);
            match parts.reference_date(2000) {
                Some(date) => println!("Date:   {}", date),
                None => {
                    return Err(LabelError::InvalidBatchCode {
                        code: code.clone(),
                        reason: "embedded date does not exist".to_string(),
                    })
                }
            }
        }
        Command::ObjectKey {
            kind,
            file,
            date,
            token,
            content_type,
            size,
        } => {
            let upload_date = reference_or_today(date.as_deref(), settings)?;
            let token = token.clone().unwrap_or_else(new_token);
            let key = match (content_type, size) {
                (Some(content_type), Some(size_bytes)) => {
                    let upload = ImageUpload {
                        original_name: file.clone(),
                        content_type: content_type.clone(),
                        size_bytes: *size_bytes,
                    };
                    upload_key(*kind, &upload, upload_date, &token)?
                }
                _ => {
                    validate_token(&token)?;
                    object_key(*kind, upload_date, &token, file)
                }
            };
            println!("{}", key);
        }
        Command::ResolveKey { kind, name } => {
            println!("{}", normalize_object_key(*kind, name));
        }
    }

    Ok(0)
}
