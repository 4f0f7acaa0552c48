//! Borrador de orden: los valores crudos del formulario antes de validar.

use crate::{AccessoryLine, Celda, DomainError, NewOrder, Placement, SchemaLayout};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub order_number: String,
    pub accessories: Vec<AccessoryLine>,
    pub extra_accessory: bool,
    pub selected: bool,
    pub celda: Option<String>,
}

impl OrderDraft {
    pub fn new(order_number: impl Into<String>) -> Self {
        Self { order_number: order_number.into(),
               ..Self::default() }
    }

    pub fn with_accessory(mut self, line: AccessoryLine) -> Self {
        self.accessories.push(line);
        self
    }

    pub fn with_extra_accessory(mut self, extra: bool) -> Self {
        self.extra_accessory = extra;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_celda(mut self, celda: impl Into<String>) -> Self {
        self.celda = Some(celda.into());
        self
    }

    /// Validación del lado del cliente, en el mismo orden en que el
    /// formulario la aplica:
    /// 1. el formulario está habilitado (`extra_accessory`),
    /// 2. número de orden no vacío,
    /// 3. al menos un accesorio, todos con cantidad >= 1,
    /// 4. celda válida cuando el esquema la exige.
    pub fn validate(&self, layout: SchemaLayout) -> Result<NewOrder, DomainError> {
        if !self.extra_accessory {
            return Err(DomainError::FormDisabled);
        }
        let order_number = self.order_number.trim();
        if order_number.is_empty() {
            return Err(DomainError::MissingOrderNumber);
        }
        if self.accessories.is_empty() {
            return Err(DomainError::NoAccessories);
        }
        for line in &self.accessories {
            line.validate()?;
        }
        let placement = match layout {
            SchemaLayout::Normalized => Placement::Selected(self.selected),
            SchemaLayout::Flat => {
                let raw = self.celda
                              .as_deref()
                              .map(str::trim)
                              .filter(|c| !c.is_empty())
                              .ok_or(DomainError::MissingCelda)?;
                Placement::Celda(raw.parse::<Celda>()?)
            }
        };
        Ok(NewOrder::new(order_number.to_string(),
                         self.accessories.clone(),
                         self.extra_accessory,
                         placement))
    }
}
