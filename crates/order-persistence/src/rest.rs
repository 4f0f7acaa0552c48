//! Backend REST: esquema plano servido por el API de tablas de Supabase
//! (PostgREST) en `/rest/v1/orders`.
//!
//! Los parámetros de consulta se arman con funciones puras para poder
//! probarlos sin red. Cliente bloqueante con timeout de 30 s.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error};
use order_core::{OrderStore, StoreError};
use order_domain::{group_rows, CloseOrder, FlatOrderRow, NewFlatRow, NewOrder, Order, OrderFilter, SchemaLayout};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::RestConfig;
use crate::error::PersistenceError;

const TABLE_PATH: &str = "/rest/v1/orders";
const ROW_ORDER: &str = "order_date.desc,id.asc";

type Params = Vec<(&'static str, String)>;

/// Valor entre comillas dobles para filtros PostgREST (`in.(...)`, `or=(...)`).
fn quoted(value: &str) -> String { format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")) }

/// Patrón `ilike` de PostgREST: `*` es el comodín y no admite escape, así
/// que un `*` del término pasa a `_`. `%`, `_` y `\` quedan escapados.
/// Las coincidencias de más se descartan luego con `keep_matching`.
fn ilike_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('*');
    for c in term.chars() {
        match c {
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '*' => out.push('_'),
            _ => out.push(c),
        }
    }
    out.push('*');
    out
}

fn timestamp(at: DateTime<Utc>) -> String { at.to_rfc3339_opts(SecondsFormat::Secs, true) }

pub(crate) fn list_all_params() -> Params { vec![("select", "*".into()), ("order", ROW_ORDER.into())] }

/// Primer paso de la búsqueda: números de orden que coinciden.
pub(crate) fn matching_numbers_params(filter: &OrderFilter) -> Params {
    let mut params: Params = vec![("select", "order_number".into())];
    if let Some(term) = filter.search_term() {
        let pattern = quoted(&ilike_pattern(term));
        params.push(("or",
                     format!("(order_number.ilike.{pattern},accessory_type.ilike.{pattern},celda.ilike.{pattern})")));
    }
    if let Some((start, end)) = filter.day_bounds() {
        params.push(("order_date", format!("gte.{}", timestamp(start))));
        params.push(("order_date", format!("lt.{}", timestamp(end))));
    }
    params
}

/// Segundo paso: todas las filas de esos números.
pub(crate) fn rows_for_numbers_params(numbers: &[String]) -> Params {
    let list = numbers.iter().map(|n| quoted(n)).collect::<Vec<_>>().join(",");
    vec![("select", "*".into()), ("order_number", format!("in.({list})")), ("order", ROW_ORDER.into())]
}

pub(crate) fn by_id_params(id: i64) -> Params { vec![("select", "order_number".into()), ("id", format!("eq.{id}"))] }

pub(crate) fn by_number_params(order_number: &str) -> Params {
    vec![("order_number", format!("eq.{order_number}"))]
}

#[derive(Debug, Deserialize)]
struct NumberOnly {
    order_number: String,
}

/// Números únicos, ordenados, a partir de las filas coincidentes.
fn distinct_numbers(matched: Vec<NumberOnly>) -> Vec<String> {
    let mut numbers: Vec<String> = matched.into_iter().map(|m| m.order_number).collect();
    numbers.sort();
    numbers.dedup();
    numbers
}

/// Deja sólo las órdenes que coinciden con el filtro, igual que el backend
/// en memoria.
fn keep_matching(mut orders: Vec<Order>, filter: &OrderFilter) -> Vec<Order> {
    orders.retain(|o| filter.matches(o));
    orders
}

#[derive(Debug, Serialize)]
struct ClosePatch {
    is_closed: bool,
    accessories_added: bool,
}

pub struct RestOrderStore {
    client: Client,
    config: RestConfig,
}

impl RestOrderStore {
    pub fn new(config: RestConfig) -> Result<Self, PersistenceError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, PersistenceError> { Self::new(RestConfig::from_env()?) }

    pub fn config(&self) -> &RestConfig { &self.config }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.config.anon_key)
               .bearer_auth(&self.config.anon_key)
               .header("Accept", "application/json")
    }

    fn url(&self) -> String { format!("{}{}", self.config.url, TABLE_PATH) }

    fn checked(response: Response) -> Result<Response, PersistenceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().unwrap_or_default();
        Err(PersistenceError::Http { status: status.as_u16(),
                                     message })
    }

    fn get_json<T: DeserializeOwned>(&self, params: &Params) -> Result<T, PersistenceError> {
        let response = self.authorized(self.client.get(self.url()).query(params)).send()?;
        Ok(Self::checked(response)?.json()?)
    }

    fn rows_for_numbers(&self, numbers: &[String]) -> Result<Vec<FlatOrderRow>, PersistenceError> {
        self.get_json(&rows_for_numbers_params(numbers))
    }

    fn group(rows: Vec<FlatOrderRow>) -> Result<Vec<Order>, PersistenceError> { Ok(group_rows(rows)?) }

    fn load_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, PersistenceError> {
        if filter.is_empty() {
            return Self::group(self.get_json(&list_all_params())?);
        }
        let numbers = distinct_numbers(self.get_json(&matching_numbers_params(filter))?);
        if numbers.is_empty() {
            return Ok(Vec::new());
        }
        Ok(keep_matching(Self::group(self.rows_for_numbers(&numbers)?)?, filter))
    }

    fn number_of(&self, id: i64) -> Result<Option<String>, PersistenceError> {
        let found: Vec<NumberOnly> = self.get_json(&by_id_params(id))?;
        Ok(found.into_iter().next().map(|n| n.order_number))
    }

    fn load_one(&self, id: i64) -> Result<Option<Order>, PersistenceError> {
        let Some(number) = self.number_of(id)? else {
            return Ok(None);
        };
        Ok(Self::group(self.rows_for_numbers(std::slice::from_ref(&number))?)?.into_iter().next())
    }

    fn number_exists(&self, order_number: &str) -> Result<bool, PersistenceError> {
        let mut params = by_number_params(order_number);
        params.push(("select", "order_number".into()));
        params.push(("limit", "1".into()));
        let found: Vec<NumberOnly> = self.get_json(&params)?;
        Ok(!found.is_empty())
    }

    fn insert_rows(&self, order: &NewOrder, order_date: DateTime<Utc>) -> Result<Order, PersistenceError> {
        let rows = NewFlatRow::rows_for(order, order_date)?;
        let response = self.authorized(self.client.post(self.url()))
                           .header("Prefer", "return=representation")
                           .json(&rows)
                           .send()?;
        let inserted: Vec<FlatOrderRow> = Self::checked(response)?.json()?;
        Self::group(inserted)?.into_iter()
                              .next()
                              .ok_or_else(|| PersistenceError::InvalidRow("insert returned no rows".into()))
    }

    fn close_rows(&self, request: &CloseOrder) -> Result<Order, PersistenceError> {
        let number = self.number_of(request.id())?.ok_or(PersistenceError::NotFound)?;
        let patch = ClosePatch { is_closed: true,
                                 accessories_added: request.accessories_added() };
        let response = self.authorized(self.client.patch(self.url()))
                           .query(&by_number_params(&number))
                           .header("Prefer", "return=representation")
                           .json(&patch)
                           .send()?;
        let updated: Vec<FlatOrderRow> = Self::checked(response)?.json()?;
        debug!("rest:close order_number={number} rows={}", updated.len());
        Self::group(updated)?.into_iter().next().ok_or(PersistenceError::NotFound)
    }

    fn ping(&self) -> Result<(), PersistenceError> {
        let _: Vec<serde_json::Value> = self.get_json(&vec![("select", "id".into()), ("limit", "1".into())])?;
        Ok(())
    }
}

fn logged<T>(op: &str, result: Result<T, PersistenceError>) -> Result<T, StoreError> {
    result.map_err(|e| {
              error!("rest:{op} err={e}");
              StoreError::from(e)
          })
}

impl OrderStore for RestOrderStore {
    fn layout(&self) -> SchemaLayout { SchemaLayout::Flat }

    fn backend_name(&self) -> &'static str { "rest" }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        debug!("rest:list search={:?} date={:?}", filter.search_term(), filter.date);
        logged("list", self.load_orders(filter))
    }

    fn find(&self, id: i64) -> Result<Option<Order>, StoreError> { logged("find", self.load_one(id)) }

    fn exists(&self, order_number: &str) -> Result<bool, StoreError> {
        logged("exists", self.number_exists(order_number))
    }

    fn insert(&mut self, order: &NewOrder, order_date: DateTime<Utc>) -> Result<Order, StoreError> {
        logged("insert", self.insert_rows(order, order_date))
    }

    fn close(&mut self, request: &CloseOrder) -> Result<Order, StoreError> { logged("close", self.close_rows(request)) }

    fn probe(&self) -> Result<(), StoreError> { logged("probe", self.ping()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_domain::OrderFilter;

    fn value<'a>(params: &'a Params, key: &str) -> Vec<&'a str> {
        params.iter().filter(|(k, _)| *k == key).map(|(_, v)| v.as_str()).collect()
    }

    #[test]
    fn search_covers_number_accessory_and_celda() {
        let params = matching_numbers_params(&OrderFilter::all().with_search(" bolsa "));
        assert_eq!(value(&params, "or"),
                   vec!["(order_number.ilike.\"*bolsa*\",accessory_type.ilike.\"*bolsa*\",celda.ilike.\"*bolsa*\")"]);
        assert!(value(&params, "order_date").is_empty());
    }

    #[test]
    fn date_filter_is_half_open_day() {
        let date = OrderFilter::parse_date("2024-02-29").unwrap();
        let params = matching_numbers_params(&OrderFilter::all().with_date(date));
        assert_eq!(value(&params, "order_date"), vec!["gte.2024-02-29T00:00:00Z", "lt.2024-03-01T00:00:00Z"]);
    }

    #[test]
    fn like_wildcards_in_term_are_literal() {
        let params = matching_numbers_params(&OrderFilter::all().with_search("A_1%"));
        let or = value(&params, "or");
        assert!(or[0].starts_with("(order_number.ilike.\"*A\\\\_1\\\\%*\","), "{}", or[0]);
        assert_eq!(ilike_pattern("a\\b"), "*a\\\\b*");
    }

    #[test]
    fn star_in_term_is_narrowed_after_fetch() {
        assert_eq!(ilike_pattern("A*1"), "*A_1*");
        let rows = vec![FlatOrderRow { id: 1,
                                       order_number: "AB1".into(),
                                       accessory_type: "bolsa".into(),
                                       quantity: 1,
                                       extra_accessory: false,
                                       celda: "Celda 11".into(),
                                       order_date: Utc::now(),
                                       is_closed: false,
                                       accessories_added: false },
                        FlatOrderRow { id: 2,
                                       order_number: "A*1".into(),
                                       accessory_type: "gorra".into(),
                                       quantity: 1,
                                       extra_accessory: false,
                                       celda: "Celda 11".into(),
                                       order_date: Utc::now(),
                                       is_closed: false,
                                       accessories_added: false }];
        let kept = keep_matching(group_rows(rows).unwrap(), &OrderFilter::all().with_search("A*1"));
        let numbers: Vec<&str> = kept.iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(numbers, vec!["A*1"]);
    }

    #[test]
    fn matched_numbers_are_deduplicated() {
        let matched = ["B-2", "A-1", "B-2", "A-1"].iter()
                                                  .map(|n| NumberOnly { order_number: n.to_string() })
                                                  .collect();
        assert_eq!(distinct_numbers(matched), vec!["A-1".to_string(), "B-2".to_string()]);
    }

    #[test]
    fn numbers_are_quoted_in_list() {
        let params = rows_for_numbers_params(&["A,1".to_string(), "B\"2".to_string()]);
        assert_eq!(value(&params, "order_number"), vec!["in.(\"A,1\",\"B\\\"2\")"]);
        assert_eq!(value(&params, "order"), vec![ROW_ORDER]);
    }
}
