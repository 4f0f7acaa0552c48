//! Esquema normalizado: `orders` (UNIQUE en `order_number`) y
//! `order_accessories` con FK `ON DELETE CASCADE`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::{debug, error};
use order_core::{OrderStore, StoreError};
use order_domain::{AccessoryLine, CloseOrder, NewOrder, Order, OrderFilter, Placement, SchemaLayout};

use super::{contains_pattern, ConnectionProvider, PgPooledConnection};
use crate::error::PersistenceError;
use crate::schema::normalized::{order_accessories, orders};

#[derive(Queryable, Debug)]
struct OrderRow {
    id: i64,
    order_number: String,
    extra_accessory: bool,
    selected: bool,
    order_date: DateTime<Utc>,
    is_closed: bool,
    accessories_added: bool,
}

#[derive(Queryable, Debug)]
struct AccessoryRow {
    #[allow(dead_code)]
    id: i64,
    order_id: i64,
    accessory_type: String,
    quantity: i32,
}

#[derive(Insertable)]
#[diesel(table_name = orders)]
struct NewOrderRow<'a> {
    order_number: &'a str,
    extra_accessory: bool,
    selected: bool,
    order_date: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = order_accessories)]
struct NewAccessoryRow<'a> {
    order_id: i64,
    accessory_type: &'a str,
    quantity: i32,
}

impl AccessoryRow {
    fn into_line(self) -> Result<AccessoryLine, PersistenceError> {
        let accessory_type = self.accessory_type.parse()?;
        let quantity = u32::try_from(self.quantity).map_err(|_| {
                                                       PersistenceError::InvalidRow(format!("quantity {} for order {}",
                                                                                            self.quantity, self.order_id))
                                                   })?;
        Ok(AccessoryLine::new(accessory_type, quantity))
    }
}

impl OrderRow {
    fn into_order(self, accessories: Vec<AccessoryLine>) -> Order {
        Order { id: self.id,
                order_number: self.order_number,
                accessories,
                extra_accessory: self.extra_accessory,
                placement: Placement::Selected(self.selected),
                order_date: self.order_date,
                is_closed: self.is_closed,
                accessories_added: self.accessories_added }
    }
}

/// Store Postgres del esquema normalizado.
pub struct PgNormalizedOrderStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgNormalizedOrderStore<P> {
    pub fn new(provider: P) -> Self { Self { provider } }

    /// Adjunta los accesorios a cada fila de `orders`, respetando el orden
    /// de entrada.
    fn attach_accessories(conn: &mut PgPooledConnection, rows: Vec<OrderRow>) -> Result<Vec<Order>, PersistenceError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let accessory_rows: Vec<AccessoryRow> = order_accessories::table.filter(order_accessories::order_id.eq_any(&ids))
                                                                        .order(order_accessories::id.asc())
                                                                        .load(conn)?;
        let mut by_order: HashMap<i64, Vec<AccessoryLine>> = HashMap::new();
        for row in accessory_rows {
            let order_id = row.order_id;
            by_order.entry(order_id).or_default().push(row.into_line()?);
        }
        Ok(rows.into_iter()
               .map(|row| {
                   let lines = by_order.remove(&row.id).unwrap_or_default();
                   row.into_order(lines)
               })
               .collect())
    }

    fn load_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let mut query = orders::table.order((orders::order_date.desc(), orders::id.asc()))
                                     .into_boxed();
        if let Some((start, end)) = filter.day_bounds() {
            query = query.filter(orders::order_date.ge(start)).filter(orders::order_date.lt(end));
        }
        if let Some(term) = filter.search_term() {
            let pattern = contains_pattern(term);
            let by_accessory = order_accessories::table.filter(order_accessories::accessory_type.ilike(pattern.clone()))
                                                       .select(order_accessories::order_id);
            query = query.filter(orders::order_number.ilike(pattern).or(orders::id.eq_any(by_accessory)));
        }
        let rows: Vec<OrderRow> = query.load(&mut conn)?;
        Self::attach_accessories(&mut conn, rows)
    }

    fn load_one(&self, id: i64) -> Result<Option<Order>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let row: Option<OrderRow> = orders::table.find(id).first(&mut conn).optional()?;
        match row {
            Some(row) => Ok(Self::attach_accessories(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn number_exists(&self, order_number: &str) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let found = diesel::select(diesel::dsl::exists(orders::table.filter(orders::order_number.eq(order_number))))
            .get_result(&mut conn)?;
        Ok(found)
    }

    fn insert_order(&self, order: &NewOrder, order_date: DateTime<Utc>) -> Result<Order, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let selected = order.placement().is_marked();
        conn.transaction::<Order, PersistenceError, _>(|tx| {
                let row: OrderRow = diesel::insert_into(orders::table)
                    .values(NewOrderRow { order_number: order.order_number(),
                                          extra_accessory: order.extra_accessory(),
                                          selected,
                                          order_date })
                    .get_result(tx)?;
                let mut lines = Vec::with_capacity(order.accessories().len());
                for line in order.accessories() {
                    let quantity = i32::try_from(line.quantity).map_err(|_| {
                                                                    PersistenceError::InvalidRow(format!("quantity {}",
                                                                                                         line.quantity))
                                                                })?;
                    diesel::insert_into(order_accessories::table)
                        .values(NewAccessoryRow { order_id: row.id,
                                                  accessory_type: line.accessory_type.as_str(),
                                                  quantity })
                        .execute(tx)?;
                    lines.push(line.clone());
                }
                Ok(row.into_order(lines))
            })
    }

    fn close_order(&self, request: &CloseOrder) -> Result<Order, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let row: Option<OrderRow> = diesel::update(orders::table.find(request.id()))
            .set((orders::is_closed.eq(true), orders::accessories_added.eq(request.accessories_added())))
            .get_result(&mut conn)
            .optional()?;
        let row = row.ok_or(PersistenceError::NotFound)?;
        Self::attach_accessories(&mut conn, vec![row])?.pop().ok_or(PersistenceError::NotFound)
    }

    fn ping(&self) -> Result<(), PersistenceError> {
        let mut conn = self.provider.connection()?;
        let _: Vec<i64> = orders::table.select(orders::id).limit(1).load(&mut conn)?;
        Ok(())
    }
}

fn logged<T>(op: &str, result: Result<T, PersistenceError>) -> Result<T, StoreError> {
    result.map_err(|e| {
              error!("normalized:{op} err={e}");
              StoreError::from(e)
          })
}

impl<P: ConnectionProvider> OrderStore for PgNormalizedOrderStore<P> {
    fn layout(&self) -> SchemaLayout { SchemaLayout::Normalized }

    fn backend_name(&self) -> &'static str { "postgres" }

    fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StoreError> {
        debug!("normalized:list search={:?} date={:?}", filter.search_term(), filter.date);
        logged("list", self.load_orders(filter))
    }

    fn find(&self, id: i64) -> Result<Option<Order>, StoreError> { logged("find", self.load_one(id)) }

    fn exists(&self, order_number: &str) -> Result<bool, StoreError> {
        logged("exists", self.number_exists(order_number))
    }

    fn insert(&mut self, order: &NewOrder, order_date: DateTime<Utc>) -> Result<Order, StoreError> {
        debug!("normalized:insert order_number={}", order.order_number());
        logged("insert", self.insert_order(order, order_date))
    }

    fn close(&mut self, request: &CloseOrder) -> Result<Order, StoreError> {
        debug!("normalized:close id={}", request.id());
        logged("close", self.close_order(request))
    }

    fn probe(&self) -> Result<(), StoreError> { logged("probe", self.ping()) }
}
