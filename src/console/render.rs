use std::path::Path;

use anyhow::Error;
use colored::*;

use crate::client::AnalyzeError;
use crate::types::{AnalysisEnvelope, ApplicationRecommendation, NormalizedReport, ResumeFile};

const RULE_TOP: &str = "┌─────────────────────────────────────────────────────────────";
const RULE_BOTTOM: &str = "└─────────────────────────────────────────────────────────────\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        if score >= 80 {
            ScoreBand::High
        } else if score >= 60 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            ScoreBand::High => "📈",
            ScoreBand::Medium => "➖",
            ScoreBand::Low => "📉",
        }
    }
}

pub fn display_welcome() {
    println!("{}", "📄 Resume Compatibility Checker".bright_blue().bold());
    println!(
        "{}",
        "Upload your resume and job description to get instant compatibility analysis.".blue()
    );
    println!(
        "{}",
        "Set API_BASE_URL to point at the analysis service (default http://localhost:8000).".blue()
    );
    println!("{}", "Type '/quit' or '/exit' at any prompt to stop.\n".blue());
}

pub fn display_loading() {
    println!("{}", "⏳ Analyzing...".blue().italic());
}

pub fn display_selected_file(file: &ResumeFile) {
    println!(
        "{} {} {}",
        "📎 Selected:".bright_white(),
        file.file_name().white().bold(),
        format!("({:.2} KB)", file.size_kb()).white()
    );
}

pub fn display_details(envelope: &AnalysisEnvelope) {
    println!("\n{}", "🗂️  Analysis Details".bright_cyan().bold());
    println!("{}", RULE_TOP.cyan());
    println!(
        "{} {}",
        "│ File:".cyan(),
        envelope.filename.as_deref().unwrap_or("-").white()
    );
    println!(
        "{} {}",
        "│ Analysis Type:".cyan(),
        envelope.analysis_type.as_deref().unwrap_or("-").white()
    );
    println!("{}", RULE_BOTTOM.cyan());
}

pub fn display_report(report: &NormalizedReport) {
    display_score(report.match_score);
    display_strengths_and_gaps(report);
    display_assessment(report);
    if let Some(rec) = &report.application_recommendation {
        display_application_recommendation(rec);
    }
    display_skills(report);
    if !report.recommendations.is_empty() {
        display_recommendations(&report.recommendations);
    }
}

fn display_score(score: u8) {
    let band = ScoreBand::of(score);
    let text = format!("{}%", score);
    let colored_score = match band {
        ScoreBand::High => text.bright_green().bold(),
        ScoreBand::Medium => text.bright_yellow().bold(),
        ScoreBand::Low => text.bright_red().bold(),
    };
    println!("\n{}", "🎯 Match Score".bright_white().bold());
    println!("{}", RULE_TOP.white());
    println!("│   {} {}", colored_score, band.icon());
    println!("{}", RULE_BOTTOM.white());
}

fn display_strengths_and_gaps(report: &NormalizedReport) {
    println!("{}", "💪 Your Strengths".bright_green().bold());
    if report.strengths.is_empty() {
        println!("   {}", "No strengths identified".dimmed());
    }
    for strength in &report.strengths {
        println!("   {} {}", "✓".green(), strength.white());
    }

    println!("\n{}", "🛠️  Areas to Improve".bright_yellow().bold());
    if report.gaps.is_empty() {
        println!("   {}", "No gaps identified".dimmed());
    }
    for gap in &report.gaps {
        println!("   {} {}", "⚠".yellow(), gap.white());
    }
    println!();
}

fn display_assessment(report: &NormalizedReport) {
    let Some(assessment) = &report.overall_assessment else {
        return;
    };
    println!("{}", "📝 Overall Assessment".bright_magenta().bold());
    println!("{}", RULE_TOP.magenta());
    for line in assessment.lines() {
        println!("│ {}", line.white());
    }
    if let Some(experience) = &report.experience_match {
        println!("{} {}", "│ Experience:".magenta(), experience.white());
    }
    if let Some(skills) = &report.skills_match {
        println!("{} {}", "│ Skills:".magenta(), skills.white());
    }
    println!("{}", RULE_BOTTOM.magenta());
}

fn display_application_recommendation(rec: &ApplicationRecommendation) {
    println!("{}", "📬 Application Recommendation".bright_blue().bold());
    let label = rec.label();
    let line = match rec {
        ApplicationRecommendation::Apply => format!("🟢 {}", label).bright_green().bold(),
        ApplicationRecommendation::Consider => format!("🟡 {}", label).bright_yellow().bold(),
        ApplicationRecommendation::NotRecommended => format!("🔴 {}", label).bright_red().bold(),
        ApplicationRecommendation::Other(_) => label.bold(),
    };
    println!("   {}\n", line);
}

fn display_skills(report: &NormalizedReport) {
    println!(
        "{}",
        format!("✅ Matched Skills ({})", report.matched_skills.len()).bright_green().bold()
    );
    if report.matched_skills.is_empty() {
        println!("   {}", "No matched skills found".dimmed());
    } else {
        println!("   {}", report.matched_skills.join(", ").green());
    }

    println!(
        "{}",
        format!("❌ Missing Skills ({})", report.missing_skills.len()).bright_yellow().bold()
    );
    if report.missing_skills.is_empty() {
        println!("   {}", "All required skills found!".dimmed());
    } else {
        println!("   {}", report.missing_skills.join(", ").yellow());
    }
    println!();
}

fn display_recommendations(recommendations: &[String]) {
    println!("{}", "💡 Recommendations".bright_yellow().bold());
    for (idx, rec) in recommendations.iter().enumerate() {
        println!("   {}. {}", (idx + 1).to_string().bright_white(), rec.white());
    }
    println!();
}

pub fn display_export_saved(path: &Path) {
    println!(
        "{} {}",
        "💾 Saved report to".bright_white(),
        path.display().to_string().bright_green()
    );
}

pub fn display_error(error: &Error) {
    if let Some(analyze_error) = error.downcast_ref::<AnalyzeError>() {
        display_analyze_error(analyze_error);
    } else {
        println!(
            "{} {}",
            "❌ Error:".bright_red().bold(),
            error.to_string().red()
        );
        println!("{}", "Failed to analyze resume.\n".red());
    }
}

pub fn display_analyze_error(error: &AnalyzeError) {
    let user_message = error.user_message();
    match error {
        AnalyzeError::Validation(_) => {
            println!("{}", user_message.bright_yellow().bold());
            println!(
                "{}",
                "💡 Tip: Provide a PDF, DOC or DOCX resume and a non-empty job description.".yellow()
            );
        }
        AnalyzeError::NetworkError { .. } | AnalyzeError::Status { .. } => {
            println!("{}", user_message.bright_red().bold());
            println!(
                "{}",
                "💡 Tip: Check API_BASE_URL and that the analysis service is running.".red()
            );
        }
        AnalyzeError::ServerError { .. } => {
            println!("{}", user_message.bright_red().bold());
            println!(
                "{}",
                "💡 Tip: The service rejected the submission. Fix the issue above and resubmit.".red()
            );
        }
        AnalyzeError::ParseError { .. } => {
            println!("{}", user_message.bright_magenta().bold());
            println!(
                "{}",
                "💡 Tip: The server response was not JSON. Check the service version.".magenta()
            );
        }
        AnalyzeError::ConfigError { .. } => {
            println!("{}", user_message.bright_red().bold());
            println!(
                "{}",
                "💡 Tip: Check your environment variables and configuration.".red()
            );
        }
    }
    println!();
}

pub fn display_goodbye() {
    println!("{}", "👋 Goodbye!".bright_yellow().bold());
}
