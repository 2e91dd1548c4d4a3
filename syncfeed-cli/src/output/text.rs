//! Text output formatting with progress bars and colors.

use syncfeed_core::models::{LogEntry, Product, Provider, ProviderStatus};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Set the progress bar width.
    #[allow(dead_code)]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Formats the provider table header.
    pub fn format_providers_header(&self) -> String {
        format!(
            "{:<6} {:<20} {:<10} {:<10} {:>9} {:<12} {}",
            self.bold("ID"),
            self.bold("Name"),
            self.bold("Type"),
            self.bold("Status"),
            self.bold("Products"),
            self.bold("Progress"),
            self.bold("Last Sync")
        )
    }

    /// Formats a single provider line.
    pub fn format_provider_line(&self, provider: &Provider) -> String {
        let status = self.format_status(provider.status);
        let bar = self.progress_bar(f64::from(provider.sync_progress));
        let scheduled = if provider.scheduled_sync {
            self.cyan(" [scheduled]")
        } else {
            String::new()
        };

        format!(
            "{:<6} {:<20} {:<10} {:<10} {:>9} {} {}{}",
            provider.id,
            provider.name,
            provider.kind.display_name(),
            status,
            provider.product_count,
            bar,
            self.dim(&provider.last_sync_display()),
            scheduled
        )
    }

    /// Formats a detailed single-provider view.
    pub fn format_provider_detail(&self, provider: &Provider) -> String {
        let mut lines = Vec::new();
        lines.push(self.bold(&provider.name));
        lines.push("─".repeat(40));
        lines.push(format!("ID:        {}", provider.id));
        lines.push(format!("URL:       {}", provider.url));
        lines.push(format!("Type:      {}", provider.kind.display_name()));
        lines.push(format!("Status:    {}", self.format_status(provider.status)));
        lines.push(format!("Products:  {}", provider.product_count));
        lines.push(format!(
            "Progress:  {} {:.0}%",
            self.progress_bar(f64::from(provider.sync_progress)),
            provider.sync_progress
        ));
        lines.push(format!("Last sync: {}", provider.last_sync_display()));
        lines.push(format!(
            "Scheduled: {}",
            if provider.scheduled_sync { "yes" } else { "no" }
        ));
        lines.join("\n")
    }

    /// Formats a lifecycle status with color.
    pub fn format_status(&self, status: ProviderStatus) -> String {
        match status {
            ProviderStatus::Active => self.green("active"),
            ProviderStatus::Inactive => self.dim("inactive"),
            ProviderStatus::Error => self.red("error"),
        }
    }

    /// Formats a sync progress bar.
    pub fn progress_bar(&self, percent: f64) -> String {
        let filled = ((percent / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_percent(percent, &bar)
    }

    /// Formats one log entry as a line.
    pub fn format_log_line(&self, entry: &LogEntry) -> String {
        let level = match entry.level {
            syncfeed_core::models::LogLevel::Debug => self.dim("debug"),
            syncfeed_core::models::LogLevel::Info => self.green("info "),
            syncfeed_core::models::LogLevel::Warn => self.yellow("warn "),
            syncfeed_core::models::LogLevel::Error => self.red("error"),
        };
        let category = entry
            .category
            .map(|c| format!(" [{c}]"))
            .unwrap_or_default();

        format!(
            "{} {}{} {}",
            self.dim(&entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            level,
            self.cyan(&category),
            entry.message
        )
    }

    /// Formats a scraped product line.
    pub fn format_product_line(&self, product: &Product) -> String {
        let stock = product
            .stock
            .map(|s| format!(" (stock: {s})"))
            .unwrap_or_default();
        format!(
            "{:<12} {:<30} {}{}",
            product.id,
            product.name,
            self.green(&format!("{:.2} {}", product.price, product.currency)),
            self.dim(&stock)
        )
    }

    /// Formats an error message.
    pub fn format_error(&self, context: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(context), self.red("Error"), error)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_percent(&self, percent: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent < 34.0 {
            self.red(text)
        } else if percent < 67.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            format!("{BOLD}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        if self.use_colors {
            format!("{GREEN}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn yellow(&self, text: &str) -> String {
        if self.use_colors {
            format!("{YELLOW}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn red(&self, text: &str) -> String {
        if self.use_colors {
            format!("{RED}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn cyan(&self, text: &str) -> String {
        if self.use_colors {
            format!("{CYAN}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use syncfeed_core::models::{LogLevel, ProviderKind};

    #[test]
    fn test_progress_bar_full() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(100.0), "██████████");
    }

    #[test]
    fn test_progress_bar_empty() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(0.0), "░░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_partial() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(65.0), "███████░░░");
    }

    #[test]
    fn test_color_for_percent() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.progress_bar(10.0).contains(RED));
        assert!(formatter.progress_bar(50.0).contains(YELLOW));
        assert!(formatter.progress_bar(90.0).contains(GREEN));
    }

    #[test]
    fn test_provider_line_contains_fields() {
        let formatter = TextFormatter::new(false);
        let mut provider = Provider::new(
            "p1",
            "Provider A",
            "https://provider-a.example/api",
            ProviderKind::Api,
        );
        provider.product_count = 743;
        provider.sync_progress = 100.0;

        let line = formatter.format_provider_line(&provider);
        assert!(line.contains("p1"));
        assert!(line.contains("Provider A"));
        assert!(line.contains("API"));
        assert!(line.contains("743"));
        assert!(line.contains("Never"));
    }

    #[test]
    fn test_log_line_shows_category() {
        let formatter = TextFormatter::new(false);
        let mut entry = LogEntry::new(LogLevel::Warn, "slow response");
        entry.category = Some(syncfeed_core::models::LogCategory::Api);

        let line = formatter.format_log_line(&entry);
        assert!(line.contains("warn"));
        assert!(line.contains("[api]"));
        assert!(line.contains("slow response"));
    }
}
