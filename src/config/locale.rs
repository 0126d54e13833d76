use crate::error::{AdminResult, BadDateTimeFormatterSnafu, InvalidLocaleSnafu, LoadCollatorSnafu};
use icu::{
    calendar::{Date, Iso},
    collator::{Collator, CollatorBorrowed, CollatorPreferences, options::CollatorOptions},
    datetime::{DateTimeFormatter, DateTimeFormatterPreferences, fieldsets::YMD},
    locale::Locale,
};
use jiff_icu::ConvertFrom;
use snafu::ResultExt;

/// Locale-dependent behaviour of the screens: how names compare when sorting, and how dates are
/// written in the detail view.
///
/// Only preferences are kept here. Collators and formatters are built where they're used, which
/// keeps this `Send + Sync` for the shared state.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    pub locale: Locale,
    dtf_prefs: DateTimeFormatterPreferences,
}

impl LocaleConfig {
    pub fn new(locale: String) -> AdminResult<Self> {
        let locale =
            Locale::try_from_str(&locale).context(InvalidLocaleSnafu { provided: locale })?;
        let dtf_prefs = DateTimeFormatterPreferences::from(&locale);

        let config = Self { locale, dtf_prefs };
        //fail at startup rather than on the first sort or detail view
        config.collator()?;
        config.short_ymd(jiff::civil::date(2000, 1, 1))?;

        Ok(config)
    }

    pub fn collator(&self) -> AdminResult<CollatorBorrowed<'static>> {
        Collator::try_new(
            CollatorPreferences::from(&self.locale),
            CollatorOptions::default(),
        )
        .context(LoadCollatorSnafu)
    }

    //TODO: cache the formatter per thread if the detail view ever shows up in profiles
    pub fn short_ymd(&self, date: jiff::civil::Date) -> AdminResult<String> {
        let date = Date::<Iso>::convert_from(date);
        Ok(DateTimeFormatter::try_new(self.dtf_prefs, YMD::short())
            .context(BadDateTimeFormatterSnafu)?
            .format(&date)
            .to_string())
    }

    /// Formats `raw` as a date if it parses as one, otherwise hands it back untouched.
    pub fn display_date(&self, raw: &str) -> String {
        let Ok(date) = raw.trim().parse::<jiff::civil::Date>() else {
            return raw.to_string();
        };

        self.short_ymd(date).unwrap_or_else(|e| {
            warn!(?e, ?raw, "unable to format date");
            raw.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn pt_br() -> LocaleConfig {
        LocaleConfig::new("pt-BR".to_string()).expect("pt-BR is compiled in")
    }

    #[test]
    fn collation_ignores_case_and_accents_at_primary_level() {
        let collator = pt_br().collator().unwrap();
        assert_eq!(collator.compare("Álvaro", "Bruno"), Ordering::Less);
        assert_eq!(collator.compare("bruno", "Carla"), Ordering::Less);
        assert_eq!(collator.compare("Zé", "ana"), Ordering::Greater);
    }

    #[test]
    fn unparseable_dates_are_shown_raw() {
        let locale = pt_br();
        assert_eq!(locale.display_date("ontem"), "ontem");
        assert_ne!(locale.display_date("2023-01-01"), "2023-01-01");
        assert!(locale.display_date("2023-01-01").contains("2023"));
    }

    #[test]
    fn bad_locales_are_rejected() {
        assert!(LocaleConfig::new("!!".to_string()).is_err());
    }

    #[test]
    fn config_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LocaleConfig>();
        assert_send_sync::<crate::state::AdminState>();
    }
}
