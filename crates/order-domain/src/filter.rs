use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::{DomainError, Order};

/// Filtro de la vista de listado: texto libre y/o fecha de calendario.
///
/// El texto se compara sin distinguir mayúsculas contra el número de orden,
/// los tipos de accesorio y la celda. La fecha cubre el día completo en UTC,
/// `[fecha, fecha + 1 día)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub date: Option<NaiveDate>,
}

impl OrderFilter {
    pub fn all() -> Self { Self::default() }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// `AAAA-MM-DD`, como lo entrega un `<input type="date">`.
    pub fn parse_date(raw: &str) -> Result<NaiveDate, DomainError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| DomainError::InvalidDate(raw.trim().to_string()))
    }

    pub fn search_term(&self) -> Option<&str> { self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) }

    pub fn is_empty(&self) -> bool { self.search_term().is_none() && self.date.is_none() }

    pub fn day_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let date = self.date?;
        let start = date.and_hms_opt(0, 0, 0)?.and_utc();
        let end = date.checked_add_days(Days::new(1))?.and_hms_opt(0, 0, 0)?.and_utc();
        Some((start, end))
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some((start, end)) = self.day_bounds() {
            if order.order_date < start || order.order_date >= end {
                return false;
            }
        }
        match self.search_term() {
            None => true,
            Some(term) => {
                let needle = term.to_lowercase();
                order.order_number.to_lowercase().contains(&needle)
                || order.accessories.iter().any(|a| a.accessory_type.as_str().contains(&needle))
                || order.celda().is_some_and(|c| c.as_str().to_lowercase().contains(&needle))
            }
        }
    }
}
