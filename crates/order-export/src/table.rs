//! Tabla intermedia: una fila por orden mostrada.

use order_domain::{Order, SchemaLayout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// La columna de ubicación depende del esquema: `Celda` en el plano,
    /// `Seleccionado` en el normalizado.
    pub fn from_orders(orders: &[Order], layout: SchemaLayout) -> Self {
        let placement_header = match layout {
            SchemaLayout::Flat => "Celda",
            SchemaLayout::Normalized => "Seleccionado",
        };
        let headers = ["ID",
                       "Número de Orden",
                       "Accesorios",
                       "Cantidad",
                       "Accesorio Extra",
                       placement_header,
                       "Fecha",
                       "Estado"].iter()
                                .map(|h| h.to_string())
                                .collect();
        let rows = orders.iter()
                         .map(|o| {
                             vec![o.id.to_string(),
                                  o.order_number.clone(),
                                  o.accessories_summary(),
                                  o.total_quantity().to_string(),
                                  if o.extra_accessory { "Sí" } else { "No" }.to_string(),
                                  o.placement.label(),
                                  o.order_date.format("%Y-%m-%d %H:%M").to_string(),
                                  o.status().label().to_string()]
                         })
                         .collect();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}
