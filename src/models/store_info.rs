use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Open,
    Closed,
}

/// Franja horaria tal y como la devuelve la API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Pickup,
    Delivery,
}

/// Configuración por tipo de pedido (recogida / reparto)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub order_type: OrderType,
    pub enabled: bool,
    #[serde(default)]
    pub service_hours: Vec<BusinessHours>,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub packaging_fee: f64,
    #[serde(default)]
    pub service_fee: f64,
    #[serde(default)]
    pub pickup_point: Option<String>,
    #[serde(default)]
    pub delivery_area: Option<Vec<String>>,
}

/// Datos de la tienda (`GET /store/{storeCode}/info`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub id: i64,
    pub store_code: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub status: StoreStatus,
    #[serde(default)]
    pub store_type: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub business_hours: Vec<BusinessHours>,
    #[serde(default)]
    pub config: Vec<StoreConfig>,
}

impl StoreInfo {
    pub fn is_open(&self) -> bool {
        self.status == StoreStatus::Open
    }

    /// Configuración activa para un tipo de pedido
    pub fn config_for(&self, order_type: &OrderType) -> Option<&StoreConfig> {
        self.config
            .iter()
            .find(|c| &c.order_type == order_type && c.enabled)
    }
}
