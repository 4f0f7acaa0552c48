//! Esquema Diesel escrito a mano. Los dos módulos describen tablas con el
//! mismo nombre (`orders`): una base sólo contiene uno de los dos esquemas.

pub mod normalized {
    diesel::table! {
        orders (id) {
            id -> BigInt,
            order_number -> Text,
            extra_accessory -> Bool,
            selected -> Bool,
            order_date -> Timestamptz,
            is_closed -> Bool,
            accessories_added -> Bool,
        }
    }

    diesel::table! {
        order_accessories (id) {
            id -> BigInt,
            order_id -> BigInt,
            accessory_type -> Text,
            quantity -> Integer,
        }
    }

    diesel::joinable!(order_accessories -> orders (order_id));

    diesel::allow_tables_to_appear_in_same_query!(orders, order_accessories);
}

pub mod flat {
    diesel::table! {
        orders (id) {
            id -> BigInt,
            order_number -> Text,
            accessory_type -> Text,
            quantity -> Integer,
            extra_accessory -> Bool,
            celda -> Text,
            order_date -> Timestamptz,
            is_closed -> Bool,
            accessories_added -> Bool,
        }
    }
}
