// src/models/payload.rs

use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::error::PayloadError;

// ---
// Validações customizadas (Decimal não tem `range` no validator)
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_percentage(val: &Decimal) -> Result<(), ValidationError> {
    if *val < Decimal::ZERO || *val > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("O percentual deve estar entre 0 e 100.".into());
        return Err(err);
    }
    Ok(())
}

/// Deserializadores para campos do serviço de analytics.
pub mod de {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Valores monetários e percentuais. O pandas serializa NaN como `null`
    /// (ex.: crescimento do primeiro mês); `null`, `"NaN"` e `"Infinity"` viram zero
    /// para não derrubar a seção inteira por uma linha.
    pub fn amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Decimal::ZERO),
            Value::Number(n) => parse_decimal(&n.to_string())
                .ok_or_else(|| serde::de::Error::custom(format!("valor numérico inválido: {}", n))),
            Value::String(text) => {
                let text = text.trim();
                if is_non_finite(text) {
                    return Ok(Decimal::ZERO);
                }
                parse_decimal(text)
                    .ok_or_else(|| serde::de::Error::custom(format!("valor numérico inválido: '{}'", text)))
            }
            other => Err(serde::de::Error::custom(format!("esperava número, recebeu {}", other))),
        }
    }

    fn is_non_finite(text: &str) -> bool {
        matches!(
            text.to_ascii_lowercase().as_str(),
            "nan" | "inf" | "-inf" | "+inf" | "infinity" | "-infinity" | "+infinity"
        )
    }

    // `1e25` não passa no `from_str`
    fn parse_decimal(text: &str) -> Option<Decimal> {
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
    }

    /// Contagens chegam como `12` ou `12.0` (o serviço agrega com floats).
    /// Frações e negativos são rejeitados.
    pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = serde_json::Number::deserialize(deserializer)?;
        if let Some(v) = n.as_u64() {
            return Ok(v);
        }
        match n.as_f64() {
            Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(v as u64),
            _ => Err(serde::de::Error::custom(format!("contagem inválida: {}", n))),
        }
    }
}

// --- 1. Visão Geral ---
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct OverviewMetrics {
    #[serde(default, deserialize_with = "de::amount")]
    #[validate(custom(function = "validate_not_negative"))]
    pub total_revenue: Decimal,
    #[serde(deserialize_with = "de::count")]
    pub total_orders: u64,
    #[serde(deserialize_with = "de::count")]
    pub active_customers: u64,
}

// --- 2. Crescimento ---
// No fio vem aninhado (revenue_growth / orders_growth); aqui fica achatado.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct GrowthMetrics {
    pub revenue_growth_percent: Decimal,
    pub orders_growth_percent: Decimal,
    #[validate(custom(function = "validate_not_negative"))]
    pub previous_month_revenue: Decimal,
    pub previous_month_orders: u64,
}

#[derive(Debug, Deserialize)]
struct GrowthMetricsWire {
    revenue_growth: RevenueGrowthWire,
    orders_growth: OrdersGrowthWire,
}

#[derive(Debug, Deserialize)]
struct RevenueGrowthWire {
    #[serde(rename = "Previous_Month_Revenue", default, deserialize_with = "de::amount")]
    previous_month_revenue: Decimal,
    #[serde(rename = "Revenue_Growth_Percent", default, deserialize_with = "de::amount")]
    revenue_growth_percent: Decimal,
}

#[derive(Debug, Deserialize)]
struct OrdersGrowthWire {
    #[serde(rename = "Previous_Month_Orders", deserialize_with = "de::count")]
    previous_month_orders: u64,
    #[serde(rename = "Orders_Growth_Percent", default, deserialize_with = "de::amount")]
    orders_growth_percent: Decimal,
}

impl From<GrowthMetricsWire> for GrowthMetrics {
    fn from(wire: GrowthMetricsWire) -> Self {
        Self::from_wire_ref(&wire)
    }
}

// --- 3. Desempenho Regional ---
// A ordem de chegada é a ordem do ranking (não reordenamos).
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct RegionalPerformance {
    #[serde(rename = "Region")]
    #[validate(length(min = 1, message = "A região não pode ser vazia."))]
    pub region: String,
    #[serde(rename = "Total_Revenue", default, deserialize_with = "de::amount")]
    #[validate(custom(function = "validate_not_negative"))]
    pub total_revenue: Decimal,
    #[serde(rename = "Total_Orders", deserialize_with = "de::count")]
    pub total_orders: u64,
    #[serde(rename = "Active_Customers", deserialize_with = "de::count")]
    pub active_customers: u64,
    #[serde(rename = "Percentage_of_Total", default, deserialize_with = "de::amount")]
    #[validate(custom(function = "validate_percentage"))]
    pub percent_of_total: Decimal,
}

// --- 4. Vendas Mensais ---
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct MonthlySales {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Revenue", default, deserialize_with = "de::amount")]
    #[validate(custom(function = "validate_not_negative"))]
    pub revenue: Decimal,
    #[serde(rename = "Gross_Revenue", default, deserialize_with = "de::amount")]
    #[validate(custom(function = "validate_not_negative"))]
    pub gross_revenue: Decimal,
    #[serde(rename = "Orders", deserialize_with = "de::count")]
    pub orders: u64,
    #[serde(rename = "Customers", deserialize_with = "de::count")]
    pub customers: u64,
    #[serde(rename = "Month_over_Month_Growth", default, deserialize_with = "de::amount")]
    pub mom_growth_percent: Decimal,
    // Meta real. Hoje o serviço não envia; quando enviar, substitui o fallback.
    #[serde(rename = "Target", default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub target: Option<Decimal>,
}

// --- 5. Estoque ---
// in_stock + low_stock + out_of_stock <= total_products NÃO é verificado aqui.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InventoryStatus {
    #[serde(rename = "In_Stock", deserialize_with = "de::count")]
    pub in_stock: u64,
    #[serde(rename = "Low_Stock", deserialize_with = "de::count")]
    pub low_stock: u64,
    #[serde(rename = "Out_of_Stock", deserialize_with = "de::count")]
    pub out_of_stock: u64,
    #[serde(rename = "Reorder_Required", deserialize_with = "de::count")]
    pub reorder_required: u64,
    #[serde(rename = "Total_Products", deserialize_with = "de::count")]
    pub total_products: u64,
}

// ---
// Problemas por seção
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PayloadSection {
    Overview,
    Growth,
    RegionalPerformance,
    MonthlySales,
    InventoryStatus,
    AiAnalysis,
}

impl PayloadSection {
    fn wire_key(self) -> &'static str {
        match self {
            PayloadSection::Overview => "overview_metrics",
            PayloadSection::Growth => "growth_metrics",
            PayloadSection::RegionalPerformance => "regional_performance",
            PayloadSection::MonthlySales => "monthly_sales",
            PayloadSection::InventoryStatus => "inventory_status",
            PayloadSection::AiAnalysis => "ai_analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    Missing, // Seção ausente ou null
    Invalid, // Tipo errado ou valor fora da faixa
}

/// Seção que não pôde ser lida e foi trocada pelo seu valor vazio/zerado.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionIssue {
    pub section: PayloadSection,
    pub kind: IssueKind,
    pub detail: String,
}

// ---
// O payload validado
// ---
/// Documento único do serviço de analytics, já tipado e validado.
///
/// Produzido uma vez na fronteira do fetch. Seções ausentes ou inválidas viram
/// o valor padrão (lista vazia / zeros) e ficam registradas em `issues`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardPayload {
    pub overview: OverviewMetrics,
    pub growth: GrowthMetrics,
    pub regional_performance: Vec<RegionalPerformance>,
    pub monthly_sales: Vec<MonthlySales>,
    pub inventory_status: InventoryStatus,
    pub ai_analysis: String,
    pub last_updated: String,
    pub server_time: Option<String>,
    pub status: Option<String>,
    pub issues: Vec<SectionIssue>,
}

impl DashboardPayload {
    /// Falha só se o corpo não for JSON ou não tiver `dashboard_data`.
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        let document: Value = serde_json::from_slice(body)?;
        let root = document.as_object().ok_or(PayloadError::MissingEnvelope)?;
        let data = root
            .get("dashboard_data")
            .and_then(Value::as_object)
            .ok_or(PayloadError::MissingEnvelope)?;

        let mut issues = Vec::new();

        let overview = decode_section(data, PayloadSection::Overview, &mut issues, |o: &OverviewMetrics| o.validate())
            .unwrap_or_default();

        let growth = decode_section(data, PayloadSection::Growth, &mut issues, |w: &GrowthMetricsWire| {
            GrowthMetrics::from_wire_ref(w).validate()
        })
            .map(GrowthMetrics::from)
            .unwrap_or_default();

        let regional_performance = decode_section(data, PayloadSection::RegionalPerformance, &mut issues, |rows: &Vec<RegionalPerformance>| {
            rows.iter().try_for_each(Validate::validate)
        })
            .unwrap_or_default();

        let monthly_sales = decode_section(data, PayloadSection::MonthlySales, &mut issues, |rows: &Vec<MonthlySales>| {
            rows.iter().try_for_each(Validate::validate)
        })
            .unwrap_or_default();

        let inventory_status = decode_section(data, PayloadSection::InventoryStatus, &mut issues, |_: &InventoryStatus| Ok(()))
            .unwrap_or_default();

        // Análise vazia é normal; só reclamamos se vier com tipo errado
        let ai_analysis = match data.get("ai_analysis") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => {
                issues.push(SectionIssue {
                    section: PayloadSection::AiAnalysis,
                    kind: IssueKind::Invalid,
                    detail: format!("esperava texto, recebeu {}", other),
                });
                String::new()
            }
        };

        let root_str = |key: &str| root.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            overview,
            growth,
            regional_performance,
            monthly_sales,
            inventory_status,
            ai_analysis,
            last_updated: root_str("last_updated").unwrap_or_default(),
            server_time: root_str("server_time"),
            status: root_str("status"),
            issues,
        })
    }
}

impl GrowthMetrics {
    fn from_wire_ref(wire: &GrowthMetricsWire) -> Self {
        Self {
            revenue_growth_percent: wire.revenue_growth.revenue_growth_percent,
            orders_growth_percent: wire.orders_growth.orders_growth_percent,
            previous_month_revenue: wire.revenue_growth.previous_month_revenue,
            previous_month_orders: wire.orders_growth.previous_month_orders,
        }
    }
}

// Lê uma seção isolada: erro numa seção não derruba as outras.
fn decode_section<T, F>(
    data: &Map<String, Value>,
    section: PayloadSection,
    issues: &mut Vec<SectionIssue>,
    check: F,
) -> Option<T>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Result<(), ValidationErrors>,
{
    let raw = match data.get(section.wire_key()) {
        None | Some(Value::Null) => {
            issues.push(SectionIssue {
                section,
                kind: IssueKind::Missing,
                detail: format!("'{}' ausente no payload", section.wire_key()),
            });
            return None;
        }
        Some(raw) => raw,
    };

    let parsed = T::deserialize(raw).map_err(|e| e.to_string()).and_then(|value| {
        check(&value).map(|_| value).map_err(|e| e.to_string())
    });

    match parsed {
        Ok(value) => Some(value),
        Err(detail) => {
            tracing::warn!("⚠️ Seção '{}' inválida, usando valor vazio: {}", section.wire_key(), detail);
            issues.push(SectionIssue { section, kind: IssueKind::Invalid, detail });
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::SAMPLE_JSON;
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn parses_full_document() {
        let payload = DashboardPayload::parse(SAMPLE_JSON.as_bytes()).unwrap();

        assert!(payload.issues.is_empty(), "issues: {:?}", payload.issues);
        assert_eq!(payload.overview.total_revenue, dec!(1234500));
        assert_eq!(payload.overview.active_customers, 987);
        assert_eq!(payload.growth.orders_growth_percent, dec!(-5.25));
        assert_eq!(payload.growth.previous_month_orders, 4560);
        assert_eq!(payload.regional_performance[0].region, "Western Cape");
        assert_eq!(payload.regional_performance[1].percent_of_total, dec!(49.5));
        assert_eq!(payload.monthly_sales[0].target, None);
        assert_eq!(payload.inventory_status.total_products, 139);
        assert_eq!(payload.ai_analysis, "Receita em alta.");
        assert_eq!(payload.last_updated, "2024-06-30 12:00:00");
        assert_eq!(payload.status.as_deref(), Some("success"));
    }

    #[test]
    fn missing_section_degrades_only_that_section() {
        let mut document: Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        document["dashboard_data"].as_object_mut().unwrap().remove("regional_performance");
        let body = serde_json::to_vec(&document).unwrap();

        let payload = DashboardPayload::parse(&body).unwrap();

        assert!(payload.regional_performance.is_empty());
        assert_eq!(payload.monthly_sales.len(), 1);
        assert_eq!(payload.overview.total_orders, 4321);
        assert_eq!(payload.issues.len(), 1);
        assert_eq!(payload.issues[0].section, PayloadSection::RegionalPerformance);
        assert_eq!(payload.issues[0].kind, IssueKind::Missing);
    }

    #[test]
    fn invalid_values_are_reported_per_section() {
        let mut document: Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        document["dashboard_data"]["regional_performance"][0]["Percentage_of_Total"] = serde_json::json!(140);
        document["dashboard_data"]["inventory_status"]["Low_Stock"] = serde_json::json!(-3);
        let body = serde_json::to_vec(&document).unwrap();

        let payload = DashboardPayload::parse(&body).unwrap();

        assert!(payload.regional_performance.is_empty());
        assert_eq!(payload.inventory_status, InventoryStatus::default());
        assert_eq!(payload.growth.revenue_growth_percent, dec!(12.5));
        let sections: Vec<_> = payload.issues.iter().map(|i| (i.section, i.kind)).collect();
        assert_eq!(
            sections,
            vec![
                (PayloadSection::RegionalPerformance, IssueKind::Invalid),
                (PayloadSection::InventoryStatus, IssueKind::Invalid),
            ]
        );
    }

    #[test]
    fn empty_region_name_is_rejected() {
        let row = fixtures::region("", dec!(10), dec!(1));
        assert!(row.validate().is_err());
    }

    #[test]
    fn target_is_read_when_present() {
        let mut document: Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        document["dashboard_data"]["monthly_sales"][0]["Target"] = serde_json::json!(400000);
        let body = serde_json::to_vec(&document).unwrap();

        let payload = DashboardPayload::parse(&body).unwrap();
        assert_eq!(payload.monthly_sales[0].target, Some(dec!(400000)));
    }

    #[test]
    fn fractional_counts_are_invalid() {
        let mut document: Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        document["dashboard_data"]["overview_metrics"]["total_orders"] = serde_json::json!(12.5);
        let body = serde_json::to_vec(&document).unwrap();

        let payload = DashboardPayload::parse(&body).unwrap();
        assert_eq!(payload.overview, OverviewMetrics::default());
        assert_eq!(payload.issues[0].section, PayloadSection::Overview);
    }

    #[test]
    fn null_growth_keeps_the_sales_chart() {
        let mut document: Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        document["dashboard_data"]["monthly_sales"][0]["Month_over_Month_Growth"] = Value::Null;
        document["dashboard_data"]["growth_metrics"]["revenue_growth"]["Revenue_Growth_Percent"] =
            serde_json::json!("NaN");
        let body = serde_json::to_vec(&document).unwrap();

        let payload = DashboardPayload::parse(&body).unwrap();

        assert!(payload.issues.is_empty(), "issues: {:?}", payload.issues);
        assert_eq!(payload.monthly_sales.len(), 1);
        assert_eq!(payload.monthly_sales[0].mom_growth_percent, Decimal::ZERO);
        assert_eq!(payload.monthly_sales[0].revenue, dec!(425000));
        assert_eq!(payload.growth.revenue_growth_percent, Decimal::ZERO);
        assert_eq!(payload.growth.orders_growth_percent, dec!(-5.25));
    }

    #[test]
    fn non_numeric_amount_still_invalidates_section() {
        let mut document: Value = serde_json::from_str(SAMPLE_JSON).unwrap();
        document["dashboard_data"]["monthly_sales"][0]["Revenue"] = serde_json::json!("muito");
        let body = serde_json::to_vec(&document).unwrap();

        let payload = DashboardPayload::parse(&body).unwrap();

        assert!(payload.monthly_sales.is_empty());
        assert_eq!(payload.issues[0].section, PayloadSection::MonthlySales);
        assert_eq!(payload.issues[0].kind, IssueKind::Invalid);
    }

    #[test]
    fn document_without_envelope_is_an_error() {
        assert!(matches!(
            DashboardPayload::parse(br#"{"status": "error"}"#),
            Err(PayloadError::MissingEnvelope)
        ));
        assert!(matches!(DashboardPayload::parse(b"<html>"), Err(PayloadError::Json(_))));
    }
}
