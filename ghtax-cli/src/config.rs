//! Rate table configuration.
//!
//! A rate file is TOML mirroring [`RateTable`]. Any section left out keeps
//! its 2024 statutory default, so a file containing only
//!
//! ```toml
//! [levies]
//! vat = "0.15"
//! ```
//!
//! changes the VAT rate and nothing else. See `config/rates.toml` for a
//! complete file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ghtax_core::RateTable;
use tracing::{debug, info};

/// Parses and validates a rate table from TOML text.
pub fn parse_rate_table(text: &str) -> Result<RateTable> {
    let table: RateTable = toml::from_str(text).context("invalid rate table TOML")?;
    table.validate().context("rate table failed validation")?;
    Ok(table)
}

/// Loads the rate table at `path`, or the 2024 defaults when `path` is `None`.
pub fn load_rate_table(path: Option<&Path>) -> Result<RateTable> {
    let Some(path) = path else {
        debug!("no rate file given, using 2024 statutory rates");
        return Ok(RateTable::ghana_2024());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rate file: {}", path.display()))?;
    let table = parse_rate_table(&text)
        .with_context(|| format!("Failed to load rate file: {}", path.display()))?;

    info!(path = %path.display(), vat = %table.levies.vat, "loaded rate table");
    Ok(table)
}

/// Renders `table` in the same TOML layout [`parse_rate_table`] accepts.
pub fn render_rate_table(table: &RateTable) -> Result<String> {
    toml::to_string_pretty(table).context("Failed to render rate table")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_file_is_the_statutory_table() {
        assert_eq!(parse_rate_table("").unwrap(), RateTable::ghana_2024());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let table = parse_rate_table("[levies]\nvat = \"0.15\"\n").unwrap();

        assert_eq!(table.levies.vat, dec!(0.15));
        assert_eq!(table.levies.nhil, dec!(0.025));
        assert_eq!(table.expense_vat, RateTable::ghana_2024().expense_vat);
    }

    #[test]
    fn out_of_range_rate_is_rejected() {
        let err = parse_rate_table("[contributions]\ntier2 = \"5\"\n").unwrap_err();

        assert!(format!("{err:#}").contains("Tier 2"), "got: {err:#}");
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = parse_rate_table("[levies\nvat = 1").unwrap_err();

        assert!(format!("{err:#}").contains("invalid rate table TOML"));
    }

    #[test]
    fn rendered_table_parses_back() {
        let mut table = RateTable::ghana_2024();
        table.levies.vat = dec!(0.15);

        let text = render_rate_table(&table).unwrap();

        assert_eq!(parse_rate_table(&text).unwrap(), table);
    }

    #[test]
    fn missing_path_uses_defaults() {
        assert_eq!(load_rate_table(None).unwrap(), RateTable::ghana_2024());
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = load_rate_table(Some(Path::new("does/not/exist.toml"))).unwrap_err();

        assert!(format!("{err}").contains("does/not/exist.toml"));
    }
}
