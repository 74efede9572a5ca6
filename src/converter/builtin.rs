//! Built-in converter: renders the supported FHIR subset with the localized
//! fragments from the language registry.

use crate::converter::{ConverterError, ConverterFactory, DisplayOrder, ParamsKey, Resolver};
use crate::fhir::{Dosage, Quantity, TimingRepeat};
use crate::i18n::{LanguageRegistry, LanguageStrings, Locale, TextValidator};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Longest accepted display separator, in characters.
pub const MAX_SEPARATOR_LEN: usize = 16;

#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinConverter;

impl BuiltinConverter {
    pub fn new() -> Self {
        Self
    }
}

impl ConverterFactory for BuiltinConverter {
    fn create(
        &self,
        locale: &Locale,
        params: &ParamsKey,
    ) -> Result<Arc<dyn Resolver>, ConverterError> {
        let language = LanguageRegistry::get().for_locale(locale).ok_or_else(|| {
            ConverterError::UnsupportedLocale {
                locale: locale.to_string(),
            }
        })?;

        if params.display_orders.is_empty() {
            return Err(ConverterError::InvalidParams {
                reason: "displayOrders must not be empty".to_string(),
            });
        }
        if params.separator.chars().count() > MAX_SEPARATOR_LEN {
            return Err(ConverterError::InvalidParams {
                reason: format!(
                    "displaySeparator longer than {} characters",
                    MAX_SEPARATOR_LEN
                ),
            });
        }

        debug!("Building resolver for {} ({})", locale, language.name);

        Ok(Arc::new(BuiltinResolver {
            locale: locale.clone(),
            strings: language.strings,
            params: params.clone(),
        }))
    }
}

pub struct BuiltinResolver {
    locale: Locale,
    strings: &'static LanguageStrings,
    params: ParamsKey,
}

#[async_trait]
impl Resolver for BuiltinResolver {
    fn locale(&self) -> &Locale {
        &self.locale
    }

    async fn render(&self, group: &[Dosage]) -> Result<String, ConverterError> {
        self.render_text(group)
    }
}

impl BuiltinResolver {
    /// Render a group: each dosage on its own, joined with the localized
    /// "then" connector.
    pub fn render_text(&self, group: &[Dosage]) -> Result<String, ConverterError> {
        let rendered = group
            .iter()
            .map(|dosage| self.render_dosage(dosage))
            .collect::<Result<Vec<_>, _>>()?;

        let text = rendered
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(self.strings.then);

        let report = TextValidator::validate(&text, &self.params.separator);
        if report.has_errors() {
            return Err(unrenderable(report.errors.join("; ")));
        }
        if report.has_warnings() {
            warn!(
                "Rendering warnings for {}: {:?}",
                self.locale, report.warnings
            );
        }

        Ok(text)
    }

    fn render_dosage(&self, dosage: &Dosage) -> Result<String, ConverterError> {
        let mut fragments = Vec::new();
        for order in &self.params.display_orders {
            if let Some(fragment) = self.fragment(*order, dosage)? {
                if !fragment.is_empty() {
                    fragments.push(fragment);
                }
            }
        }
        Ok(fragments.join(&self.params.separator))
    }

    fn fragment(
        &self,
        order: DisplayOrder,
        dosage: &Dosage,
    ) -> Result<Option<String>, ConverterError> {
        let repeat = dosage.repeat();
        match order {
            DisplayOrder::Text => Ok(dosage.text.clone()),
            DisplayOrder::PatientInstruction => Ok(dosage.patient_instruction.clone()),
            DisplayOrder::DoseQuantity => Ok(dose_quantity(dosage)),
            DisplayOrder::FrequencyPeriod => match repeat {
                Some(r) => self.frequency_period(r),
                None => Ok(None),
            },
            DisplayOrder::OffsetWhen => match repeat {
                Some(r) => self.offset_when(r),
                None => Ok(None),
            },
            DisplayOrder::DayOfWeek => match repeat {
                Some(r) => self.day_of_week(r),
                None => Ok(None),
            },
            DisplayOrder::TimeOfDay => Ok(repeat.and_then(|r| self.time_of_day(r))),
            DisplayOrder::BoundsDuration => match repeat.and_then(|r| r.bounds_duration.as_ref()) {
                Some(bounds) => self.bounds_duration(bounds),
                None => Ok(None),
            },
            DisplayOrder::Count => Ok(repeat.and_then(|r| self.count(r))),
            DisplayOrder::Code => Ok(dosage
                .timing
                .as_ref()
                .and_then(|t| t.code.as_ref())
                .and_then(|c| c.text.clone())),
            DisplayOrder::AsNeeded => Ok(match dosage.as_needed_boolean {
                Some(true) => Some(self.strings.as_needed.to_string()),
                _ => None,
            }),
        }
    }

    fn frequency_period(&self, repeat: &TimingRepeat) -> Result<Option<String>, ConverterError> {
        let Some(period) = repeat.period else {
            return Ok(None);
        };
        let unit_code = repeat
            .period_unit
            .as_deref()
            .ok_or_else(|| unrenderable("periodUnit is required when period is set"))?;

        let frequency = self.range(
            f64::from(repeat.frequency.unwrap_or(1)),
            repeat.frequency_max.map(f64::from),
        );
        let several = repeat.period_max.is_some() || period != 1.0;
        let unit = self.unit(unit_code, several)?;

        let text = if several {
            fill(
                self.strings.frequency_every_n,
                &[
                    ("frequency", frequency.as_str()),
                    ("period", self.range(period, repeat.period_max).as_str()),
                    ("unit", unit),
                ],
            )
        } else {
            fill(
                self.strings.frequency_every,
                &[("frequency", frequency.as_str()), ("unit", unit)],
            )
        };
        Ok(Some(text))
    }

    fn offset_when(&self, repeat: &TimingRepeat) -> Result<Option<String>, ConverterError> {
        if repeat.when.is_empty() {
            return Ok(None);
        }

        let phrases = repeat
            .when
            .iter()
            .map(|code| {
                self.strings
                    .when_phrase(code)
                    .ok_or_else(|| unrenderable(format!("unsupported event timing '{}'", code)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let when = self.strings.join_list(&phrases);

        match repeat.offset {
            Some(minutes) if minutes > 0 => {
                let offset = self.quantity(f64::from(minutes), "min")?;
                Ok(Some(fill(
                    self.strings.offset_when,
                    &[("offset", offset.as_str()), ("when", when.as_str())],
                )))
            }
            _ => Ok(Some(when)),
        }
    }

    fn day_of_week(&self, repeat: &TimingRepeat) -> Result<Option<String>, ConverterError> {
        if repeat.day_of_week.is_empty() {
            return Ok(None);
        }
        let days = repeat
            .day_of_week
            .iter()
            .map(|code| {
                self.strings
                    .day_name(code)
                    .ok_or_else(|| unrenderable(format!("unsupported day of week '{}'", code)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(fill(
            self.strings.day_of_week,
            &[("days", self.strings.join_list(&days).as_str())],
        )))
    }

    fn time_of_day(&self, repeat: &TimingRepeat) -> Option<String> {
        if repeat.time_of_day.is_empty() {
            return None;
        }
        let times: Vec<&str> = repeat
            .time_of_day
            .iter()
            .map(|t| match t.strip_suffix(":00") {
                Some(short) if t.len() == 8 => short,
                _ => t.as_str(),
            })
            .collect();
        Some(fill(
            self.strings.time_of_day,
            &[("times", self.strings.join_list(&times).as_str())],
        ))
    }

    fn bounds_duration(&self, bounds: &Quantity) -> Result<Option<String>, ConverterError> {
        let Some(value) = bounds.value else {
            return Ok(None);
        };
        let code = bounds
            .code
            .as_deref()
            .or(bounds.unit.as_deref())
            .ok_or_else(|| unrenderable("boundsDuration has no unit"))?;
        let duration = self.quantity(value, code)?;
        Ok(Some(fill(
            self.strings.bounds_duration,
            &[("duration", duration.as_str())],
        )))
    }

    fn count(&self, repeat: &TimingRepeat) -> Option<String> {
        let count = repeat.count?;
        let count = self.range(f64::from(count), repeat.count_max.map(f64::from));
        Some(fill(self.strings.count, &[("count", count.as_str())]))
    }

    fn range(&self, low: f64, high: Option<f64>) -> String {
        match high {
            Some(high) => fill(
                self.strings.range,
                &[
                    ("low", format_number(low).as_str()),
                    ("high", format_number(high).as_str()),
                ],
            ),
            None => format_number(low),
        }
    }

    fn quantity(&self, value: f64, unit_code: &str) -> Result<String, ConverterError> {
        let unit = self.unit(unit_code, value != 1.0)?;
        Ok(format!("{} {}", format_number(value), unit))
    }

    fn unit(&self, code: &str, plural: bool) -> Result<&'static str, ConverterError> {
        self.strings
            .unit(code, plural)
            .ok_or_else(|| unrenderable(format!("unsupported time unit '{}'", code)))
    }
}

fn dose_quantity(dosage: &Dosage) -> Option<String> {
    let quantity = dosage
        .dose_and_rate
        .iter()
        .find_map(|d| d.dose_quantity.as_ref())?;
    let value = format_number(quantity.value?);
    match quantity.unit.as_deref().or(quantity.code.as_deref()) {
        Some(unit) => Some(format!("{} {}", value, unit)),
        None => Some(value),
    }
}

/// Substitute `{name}` placeholders in a template.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
}

/// Print whole numbers without a decimal part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn unrenderable(detail: impl Into<String>) -> ConverterError {
    ConverterError::Unrenderable {
        detail: detail.into(),
    }
}
