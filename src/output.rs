use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL};

use anyhow::{Context, Result};

use crate::config::LoadTestConfig;
use crate::stats::LoadTestReport;

/// Print a summary of the load test configuration before running.
pub fn print_config_summary(config: &LoadTestConfig) {
	println!("DNS Load Test Configuration");
	println!("===========================");
	println!("Server:         {}", config.server);
	println!("Domain:         {}", config.domain);
	println!("Concurrency:    {}", config.concurrency);
	println!("Rate:           {} q/s (burst {})", config.rate, config.burst);
	println!("Duration:       {} s", config.duration.as_secs());
	println!("Timeout:        {} ms", config.timeout.as_millis());
	println!();
}

/// Build the report table shown after the run.
fn report_table(report: &LoadTestReport) -> Table {
	let mut table = Table::new();
	table.load_preset(UTF8_FULL);
	table.set_content_arrangement(ContentArrangement::Dynamic);
	table.set_header(vec!["Metric", "Value"]);

	table.add_row(vec![
		"Elapsed".to_string(),
		format!("{:.3} s", report.elapsed.as_secs_f64()),
	]);
	table.add_row(vec!["Successful queries".to_string(), report.success().to_string()]);
	table.add_row(vec!["Failed queries".to_string(), report.errors().to_string()]);
	table.add_row(vec!["Total queries".to_string(), report.total().to_string()]);
	table.add_row(vec![
		"Success %".to_string(),
		format!("{:.1}%", report.success_rate()),
	]);
	table.add_row(vec![
		"Achieved rate".to_string(),
		format!("{:.1} q/s", report.achieved_rate()),
	]);
	table.add_row(vec!["Signals dispatched".to_string(), report.dispatched.to_string()]);
	table
}

/// Print the load test report as a formatted table.
pub fn print_report(report: &LoadTestReport) {
	println!("\nLoad Test Results");
	println!("=================\n");
	println!("{}", report_table(report));
}

/// Write the configuration and report to a CSV file as one row.
pub fn write_csv(path: &str, config: &LoadTestConfig, report: &LoadTestReport) -> Result<()> {
	let mut writer = csv::Writer::from_path(path)
		.with_context(|| format!("failed to create CSV file '{}'", path))?;

	writer.write_record([
		"server", "domain", "concurrency", "rate", "burst", "duration_s",
		"elapsed_s", "success", "errors", "total",
		"success_rate", "achieved_rate", "dispatched",
	])?;
	writer.write_record([
		config.server.to_string(),
		config.domain.clone(),
		config.concurrency.to_string(),
		format!("{}", config.rate),
		config.burst.to_string(),
		config.duration.as_secs().to_string(),
		format!("{:.3}", report.elapsed.as_secs_f64()),
		report.success().to_string(),
		report.errors().to_string(),
		report.total().to_string(),
		format!("{:.1}", report.success_rate()),
		format!("{:.2}", report.achieved_rate()),
		report.dispatched.to_string(),
	])?;

	writer.flush()?;
	println!("\nResults written to: {}", path);
	Ok(())
}
