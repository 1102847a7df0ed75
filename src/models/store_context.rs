use serde::{Deserialize, Serialize};

/// Contexto de pedido: tienda + mesa/dirección opcionales
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreContext {
    pub store_code: String,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub address_id: Option<String>,
}

impl StoreContext {
    pub fn new(store_code: impl Into<String>) -> Self {
        Self {
            store_code: store_code.into(),
            table_id: None,
            address_id: None,
        }
    }

    pub fn with_table(mut self, table_id: Option<String>) -> Self {
        self.table_id = table_id;
        self
    }

    pub fn with_address(mut self, address_id: Option<String>) -> Self {
        self.address_id = address_id;
        self
    }

    /// Parámetros de contexto que no viajan en la ruta (mesa y dirección)
    pub fn carried_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(table_id) = self.table_id.as_deref() {
            params.push(("tableId", table_id));
        }
        if let Some(address_id) = self.address_id.as_deref() {
            params.push(("addressId", address_id));
        }
        params
    }
}
