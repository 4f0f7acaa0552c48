//! Esquema plano: una fila por accesorio en `orders`. Las filas de una orden
//! comparten `order_number`, fecha y flags; el cierre actualiza todas.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::{debug, error};
use order_core::{OrderStore, StoreError};
use order_domain::{group_rows, CloseOrder, FlatOrderRow, NewFlatRow, NewOrder, Order, OrderFilter, SchemaLayout};

use super::{contains_pattern, ConnectionProvider, PgPooledConnection};
use crate::error::PersistenceError;
use crate::schema::flat::orders;

#[derive(Queryable, Debug)]
struct FlatRecord {
    id: i64,
    order_number: String,
    accessory_type: String,
    quantity: i32,
    extra_accessory: bool,
    celda: String,
    order_date: DateTime<Utc>,
    is_closed: bool,
    accessories_added: bool,
}

impl From<FlatRecord> for FlatOrderRow {
    fn from(r: FlatRecord) -> Self {
        FlatOrderRow { id: r.id,
                       order_number: r.order_number,
                       accessory_type: r.accessory_type,
                       quantity: r.quantity,
                       extra_accessory: r.extra_accessory,
                       celda: r.celda,
                       order_date: r.order_date,
                       is_closed: r.is_closed,
                       accessories_added: r.accessories_added }
    }
}

#[derive(Insertable)]
#[diesel(table_name = orders)]
struct NewFlatRecord<'a> {
    order_number: &'a str,
    accessory_type: &'a str,
    quantity: i32,
    extra_accessory: bool,
    celda: &'a str,
    order_date: DateTime<Utc>,
    is_closed: bool,
    accessories_added: bool,
}

impl<'a> From<&'a NewFlatRow> for NewFlatRecord<'a> {
    fn from(r: &'a NewFlatRow) -> Self {
        NewFlatRecord { order_number: &r.order_number,
                        accessory_type: &r.accessory_type,
                        quantity: r.quantity,
                        extra_accessory: r.extra_accessory,
                        celda: &r.celda,
                        order_date: r.order_date,
                        is_closed: r.is_closed,
                        accessories_added: r.accessories_added }
    }
}

fn group(records: Vec<FlatRecord>) -> Result<Vec<Order>, PersistenceError> {
    Ok(group_rows(records.into_iter().map(FlatOrderRow::from))?)
}

/// Store Postgres del esquema plano.
pub struct PgFlatOrderStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgFlatOrderStore<P> {
    pub fn new(provider: P) -> Self { Self { provider } }

    fn rows_for_numbers(conn: &mut PgPooledConnection, numbers: &[String]) -> Result<Vec<FlatRecord>, PersistenceError> {
        Ok(orders::table.filter(orders::order_number.eq_any(numbers))
                        .order((orders::order_date.desc(), orders::id.asc()))
                        .load(conn)?)
    }

    /// Dos pasos: primero los números que coinciden, luego todas sus filas,
    /// para que una orden coincidente se devuelva completa.
    fn load_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        if filter.is_empty() {
            let rows: Vec<FlatRecord> = orders::table.order((orders::order_date.desc(), orders::id.asc()))
                                                     .load(&mut conn)?;
            return group(rows);
        }
        let mut query = orders::table.select(orders::order_number).distinct().into_boxed();
        if let Some((start, end)) = filter.day_bounds() {
            query = query.filter(orders::order_date.ge(start)).filter(orders::order_date.lt(end));
        }
        if let Some(term) = filter.search_term() {
            let pattern = contains_pattern(term);
            query = query.filter(orders::order_number.ilike(pattern.clone())
                                                     .or(orders::accessory_type.ilike(pattern.clone()))
                                                     .or(orders::celda.ilike(pattern)));
        }
        let numbers: Vec<String> = query.load(&mut conn)?;
        if numbers.is_empty() {
            return Ok(Vec::new());
        }
        group(Self::rows_for_numbers(&mut conn, &numbers)?)
    }

    fn number_of(conn: &mut PgPooledConnection, id: i64) -> Result<Option<String>, PersistenceError> {
        Ok(orders::table.find(id).select(orders::order_number).first(conn).optional()?)
    }

    fn load_one(&self, id: i64) -> Result<Option<Order>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let Some(number) = Self::number_of(&mut conn, id)? else {
            return Ok(None);
        };
        let rows = Self::rows_for_numbers(&mut conn, std::slice::from_ref(&number))?;
        Ok(group(rows)?.into_iter().next())
    }

    fn number_exists(&self, order_number: &str) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let found = diesel::select(diesel::dsl::exists(orders::table.filter(orders::order_number.eq(order_number))))
            .get_result(&mut conn)?;
        Ok(found)
    }

    fn insert_rows(&self, order: &NewOrder, order_date: DateTime<Utc>) -> Result<Order, PersistenceError> {
        let rows = NewFlatRow::rows_for(order, order_date)?;
        let records: Vec<NewFlatRecord<'_>> = rows.iter().map(NewFlatRecord::from).collect();
        let mut conn = self.provider.connection()?;
        let inserted: Vec<FlatRecord> = diesel::insert_into(orders::table).values(&records).get_results(&mut conn)?;
        group(inserted)?.into_iter()
                        .next()
                        .ok_or_else(|| PersistenceError::InvalidRow("insert returned no rows".into()))
    }

    /// Actualiza todas las filas que comparten el número de la fila `id`.
    fn close_rows(&self, request: &CloseOrder) -> Result<Order, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let number = Self::number_of(&mut conn, request.id())?.ok_or(PersistenceError::NotFound)?;
        let updated = diesel::update(orders::table.filter(orders::order_number.eq(&number)))
            .set((orders::is_closed.eq(true), orders::accessories_added.eq(request.accessories_added())))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound);
        }
        debug!("flat:close order_number={number} rows={updated}");
        let rows = Self::rows_for_numbers(&mut conn, std::slice::from_ref(&number))?;
        group(rows)?.into_iter().next().ok_or(PersistenceError::NotFound)
    }

    fn ping(&self) -> Result<(), PersistenceError> {
        let mut conn = self.provider.connection()?;
        let _: Vec<i64> = orders::table.select(orders::id).limit(1).load(&mut conn)?;
        Ok(())
    }
}

fn logged<T>(op: &str, result: Result<T, PersistenceError>) -> Result<T, StoreError> {
    result.map_err(|e| {
              error!("flat:{op} err={e}");
              StoreError::from(e)
          })
}

impl<P: ConnectionProvider> OrderStore for PgFlatOrderStore<P> {
    fn layout(&self) -> SchemaLayout { SchemaLayout::Flat }

    fn backend_name(&self) -> &'static str { "postgres" }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        debug!("flat:list search={:?} date={:?}", filter.search_term(), filter.date);
        logged("list", self.load_orders(filter))
    }

    fn find(&self, id: i64) -> Result<Option<Order>, StoreError> { logged("find", self.load_one(id)) }

    fn exists(&self, order_number: &str) -> Result<bool, StoreError> {
        logged("exists", self.number_exists(order_number))
    }

    fn insert(&mut self, order: &NewOrder, order_date: DateTime<Utc>) -> Result<Order, StoreError> {
        debug!("flat:insert order_number={} rows={}", order.order_number(), order.accessories().len());
        logged("insert", self.insert_rows(order, order_date))
    }

    fn close(&mut self, request: &CloseOrder) -> Result<Order, StoreError> { logged("close", self.close_rows(request)) }

    fn probe(&self) -> Result<(), StoreError> { logged("probe", self.ping()) }
}
