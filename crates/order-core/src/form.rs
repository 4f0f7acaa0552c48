//! Estado efímero del formulario de alta y de la tabla de órdenes.
//!
//! Nada de esto se persiste: campos, filas de accesorios, texto de
//! confirmación por fila, banner y órdenes mostradas viven sólo mientras
//! vive el `OrderForm`.

use std::collections::HashMap;

use log::{debug, warn};
use order_domain::{confirm_close, AccessoryLine, Order, OrderDraft, OrderFilter};

use crate::{Clock, OrderService, OrderStore, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    /// Validación o confirmación rechazada.
    Rejected,
    /// Fallo del backend.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: BannerKind::Success,
               message: message.into() }
    }

    fn from_error(err: &ServiceError) -> Self {
        let kind = if err.is_rejection() { BannerKind::Rejected } else { BannerKind::Failed };
        Self { kind,
               message: err.to_string() }
    }

    pub fn is_error(&self) -> bool { self.kind != BannerKind::Success }
}

#[derive(Debug, Clone)]
pub struct OrderForm {
    order_number: String,
    extra_accessory: bool,
    selected: bool,
    celda: Option<String>,
    accessories: Vec<AccessoryLine>,
    filter: OrderFilter,
    orders: Vec<Order>,
    confirmations: HashMap<i64, String>,
    banner: Option<Banner>,
    loading: bool,
}

impl Default for OrderForm {
    fn default() -> Self {
        Self { order_number: String::new(),
               extra_accessory: false,
               selected: false,
               celda: None,
               accessories: vec![AccessoryLine::default()],
               filter: OrderFilter::all(),
               orders: Vec::new(),
               confirmations: HashMap::new(),
               banner: None,
               loading: false }
    }
}

impl OrderForm {
    pub fn new() -> Self { Self::default() }

    pub fn set_order_number(&mut self, value: impl Into<String>) { self.order_number = value.into(); }

    pub fn set_extra_accessory(&mut self, value: bool) { self.extra_accessory = value; }

    pub fn set_selected(&mut self, value: bool) { self.selected = value; }

    pub fn set_celda(&mut self, value: Option<String>) { self.celda = value; }

    pub fn add_accessory(&mut self) { self.accessories.push(AccessoryLine::default()); }

    /// Quita la fila `index`; siempre queda al menos una.
    pub fn remove_accessory(&mut self, index: usize) {
        if self.accessories.len() > 1 && index < self.accessories.len() {
            self.accessories.remove(index);
        }
    }

    pub fn update_accessory(&mut self, index: usize, line: AccessoryLine) {
        if let Some(slot) = self.accessories.get_mut(index) {
            *slot = line;
        }
    }

    pub fn accessories(&self) -> &[AccessoryLine] { &self.accessories }

    /// Los campos quedan deshabilitados mientras no se marque
    /// "accesorio extra".
    pub fn is_disabled(&self) -> bool { !self.extra_accessory }

    pub fn draft(&self) -> OrderDraft {
        OrderDraft { order_number: self.order_number.clone(),
                     accessories: self.accessories.clone(),
                     extra_accessory: self.extra_accessory,
                     selected: self.selected,
                     celda: self.celda.clone() }
    }

    fn reset_fields(&mut self) {
        self.order_number.clear();
        self.extra_accessory = false;
        self.selected = false;
        self.celda = None;
        self.accessories = vec![AccessoryLine::default()];
    }

    /// Valida localmente y, si pasa, crea la orden. Devuelve `true` cuando la
    /// orden quedó guardada.
    pub fn submit<S: OrderStore, C: Clock>(&mut self, service: &mut OrderService<S, C>) -> bool {
        let draft = self.draft();
        if let Err(e) = draft.validate(service.layout()) {
            self.banner = Some(Banner::from_error(&ServiceError::Validation(e)));
            return false;
        }
        self.loading = true;
        let result = service.create(&draft);
        self.loading = false;
        match result {
            Ok(order) => {
                debug!("form: created {}", order.order_number);
                self.reset_fields();
                self.banner = Some(self.after_write(service, "Orden agregada exitosamente"));
                true
            }
            Err(e) => {
                self.banner = Some(Banner::from_error(&e));
                false
            }
        }
    }

    fn fetch<S: OrderStore, C: Clock>(&mut self, service: &OrderService<S, C>) -> Result<(), ServiceError> {
        self.loading = true;
        let result = service.search(&self.filter);
        self.loading = false;
        self.orders = result?;
        Ok(())
    }

    /// Vuelve a consultar con el filtro activo.
    pub fn refresh<S: OrderStore, C: Clock>(&mut self, service: &OrderService<S, C>) {
        if let Err(e) = self.fetch(service) {
            self.banner = Some(Banner::from_error(&e));
        }
    }

    /// Banner tras una escritura ya guardada: sigue siendo un éxito aunque
    /// la recarga de la tabla falle; el error de recarga se anexa.
    fn after_write<S: OrderStore, C: Clock>(&mut self, service: &OrderService<S, C>, done: &str) -> Banner {
        match self.fetch(service) {
            Ok(()) => Banner::success(done),
            Err(e) => {
                warn!("form: write saved but reload failed: {e}");
                Banner::success(format!("{done}. {e}"))
            }
        }
    }

    pub fn apply_filter<S: OrderStore, C: Clock>(&mut self, service: &OrderService<S, C>, filter: OrderFilter) {
        self.filter = filter;
        self.refresh(service);
    }

    pub fn filter(&self) -> &OrderFilter { &self.filter }

    pub fn set_confirmation(&mut self, id: i64, text: impl Into<String>) { self.confirmations.insert(id, text.into()); }

    pub fn confirmation(&self, id: i64) -> &str { self.confirmations.get(&id).map(String::as_str).unwrap_or("") }

    /// Cierra la orden mostrada `id`. La confirmación se compara contra la
    /// orden en pantalla antes de llamar al backend.
    pub fn close<S: OrderStore, C: Clock>(&mut self,
                                          service: &mut OrderService<S, C>,
                                          id: i64,
                                          accessories_added: bool)
                                          -> bool {
        let confirmation = self.confirmation(id).to_string();
        if let Some(order) = self.orders.iter().find(|o| o.id == id) {
            if let Err(e) = confirm_close(order, &confirmation, accessories_added) {
                self.banner = Some(Banner::from_error(&ServiceError::Validation(e)));
                return false;
            }
        }
        self.loading = true;
        let result = service.close(id, &confirmation, accessories_added);
        self.loading = false;
        match result {
            Ok(_) => {
                self.confirmations.remove(&id);
                self.banner = Some(self.after_write(service, "Orden cerrada exitosamente"));
                true
            }
            Err(e) => {
                self.banner = Some(Banner::from_error(&e));
                false
            }
        }
    }

    pub fn orders(&self) -> &[Order] { &self.orders }

    pub fn banner(&self) -> Option<&Banner> { self.banner.as_ref() }

    pub fn clear_banner(&mut self) { self.banner = None; }

    pub fn is_loading(&self) -> bool { self.loading }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_domain::AccessoryType;

    #[test]
    fn starts_with_one_accessory_row_and_keeps_it() {
        let mut form = OrderForm::new();
        assert_eq!(form.accessories().len(), 1);
        form.remove_accessory(0);
        assert_eq!(form.accessories().len(), 1);
        form.add_accessory();
        form.update_accessory(1, AccessoryLine::new(AccessoryType::Kit, 4));
        form.remove_accessory(0);
        assert_eq!(form.accessories(), &[AccessoryLine::new(AccessoryType::Kit, 4)]);
    }

    #[test]
    fn disabled_until_extra_accessory() {
        let mut form = OrderForm::new();
        assert!(form.is_disabled());
        form.set_extra_accessory(true);
        assert!(!form.is_disabled());
    }
}
