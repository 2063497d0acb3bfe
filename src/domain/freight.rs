//! Shipment volume, chargeable weight and load recommendation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::numeric::{parse_count, parse_number};

/// Cubic feet per cubic metre.
pub const CFT_PER_CBM: f64 = 35.3147;

pub const DEFAULT_LCL_RATE_PER_CBM: &str = "60";
pub const DEFAULT_FCL_RATE: &str = "1200";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Container {
    pub name: &'static str,
    pub capacity_cbm: f64,
}

/// Standard containers, smallest first.
pub const CONTAINERS: [Container; 4] = [
    Container {
        name: "20' Standard",
        capacity_cbm: 33.0,
    },
    Container {
        name: "40' Standard",
        capacity_cbm: 66.0,
    },
    Container {
        name: "40' High Cube",
        capacity_cbm: 72.0,
    },
    Container {
        name: "45' High Cube",
        capacity_cbm: 86.0,
    },
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionUnit {
    Meter,
    #[default]
    Centimeter,
    Inch,
}

impl DimensionUnit {
    pub const ALL: [DimensionUnit; 3] = [
        DimensionUnit::Meter,
        DimensionUnit::Centimeter,
        DimensionUnit::Inch,
    ];

    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            DimensionUnit::Meter => value,
            DimensionUnit::Centimeter => value / 100.0,
            DimensionUnit::Inch => value * 0.0254,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DimensionUnit::Meter => "Meter",
            DimensionUnit::Centimeter => "CM",
            DimensionUnit::Inch => "Inches",
        }
    }

    pub fn cubic_label(&self) -> &'static str {
        match self {
            DimensionUnit::Meter => "m³",
            DimensionUnit::Centimeter => "cm³",
            DimensionUnit::Inch => "in³",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportMode {
    Air,
    Sea,
    Road,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [TransportMode::Air, TransportMode::Sea, TransportMode::Road];

    /// Kilograms billed per cubic metre of cargo.
    pub fn volumetric_factor(&self) -> f64 {
        match self {
            TransportMode::Air => 167.0,
            TransportMode::Sea => 1000.0,
            TransportMode::Road => 333.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Air => "Air",
            TransportMode::Sea => "Sea",
            TransportMode::Road => "Road",
        }
    }
}

/// One package row exactly as the user typed it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageItem {
    pub id: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub quantity: String,
    pub weight_per_pkg: String,
    pub unit: DimensionUnit,
}

impl PackageItem {
    pub fn new(unit: DimensionUnit) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            length: String::new(),
            width: String::new(),
            height: String::new(),
            quantity: "1".to_string(),
            weight_per_pkg: String::new(),
            unit,
        }
    }

    /// Cubic metres for all packages of this row.
    pub fn volume_cbm(&self) -> f64 {
        let length = self.unit.to_meters(parse_number(&self.length));
        let width = self.unit.to_meters(parse_number(&self.width));
        let height = self.unit.to_meters(parse_number(&self.height));
        length * width * height * self.quantity() as f64
    }

    /// Volume in the row's own unit, before conversion.
    pub fn input_volume(&self) -> f64 {
        parse_number(&self.length)
            * parse_number(&self.width)
            * parse_number(&self.height)
            * self.quantity() as f64
    }

    pub fn weight_kg(&self) -> f64 {
        parse_number(&self.weight_per_pkg) * self.quantity() as f64
    }

    pub fn quantity(&self) -> u32 {
        parse_count(&self.quantity)
    }

    pub fn field(&self, field: PackageField) -> &str {
        match field {
            PackageField::Length => &self.length,
            PackageField::Width => &self.width,
            PackageField::Height => &self.height,
            PackageField::Quantity => &self.quantity,
            PackageField::WeightPerPkg => &self.weight_per_pkg,
        }
    }

    fn field_mut(&mut self, field: PackageField) -> &mut String {
        match field {
            PackageField::Length => &mut self.length,
            PackageField::Width => &mut self.width,
            PackageField::Height => &mut self.height,
            PackageField::Quantity => &mut self.quantity,
            PackageField::WeightPerPkg => &mut self.weight_per_pkg,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageField {
    Length,
    Width,
    Height,
    Quantity,
    WeightPerPkg,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FreightTotals {
    pub total_cbm: f64,
    pub total_cft: f64,
    pub total_weight_kg: f64,
    pub input_volume: f64,
}

pub fn totals(items: &[PackageItem]) -> FreightTotals {
    let (total_cbm, total_weight_kg, input_volume) =
        items.iter().fold((0.0, 0.0, 0.0), |(cbm, weight, raw), item| {
            (
                cbm + item.volume_cbm(),
                weight + item.weight_kg(),
                raw + item.input_volume(),
            )
        });

    FreightTotals {
        total_cbm,
        total_cft: total_cbm * CFT_PER_CBM,
        total_weight_kg,
        input_volume,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargeableWeight {
    pub mode: TransportMode,
    pub volumetric_kg: f64,
    pub chargeable_kg: f64,
}

pub fn chargeable_weight(total_cbm: f64, actual_kg: f64, mode: TransportMode) -> ChargeableWeight {
    let volumetric_kg = total_cbm * mode.volumetric_factor();
    ChargeableWeight {
        mode,
        volumetric_kg,
        chargeable_kg: actual_kg.max(volumetric_kg),
    }
}

pub fn chargeable_weights(totals: &FreightTotals) -> Vec<ChargeableWeight> {
    TransportMode::ALL
        .iter()
        .map(|mode| chargeable_weight(totals.total_cbm, totals.total_weight_kg, *mode))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadMode {
    Lcl,
    Fcl,
}

impl LoadMode {
    pub fn label(&self) -> &'static str {
        match self {
            LoadMode::Lcl => "LCL",
            LoadMode::Fcl => "FCL",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContainerFit {
    Single(Container),
    MultiContainer,
}

impl ContainerFit {
    pub fn label(&self) -> &'static str {
        match self {
            ContainerFit::Single(container) => container.name,
            ContainerFit::MultiContainer => "Multi-Container",
        }
    }
}

/// Smallest standard container that holds the whole shipment.
pub fn suggest_container(total_cbm: f64) -> ContainerFit {
    CONTAINERS
        .iter()
        .find(|container| total_cbm <= container.capacity_cbm)
        .map(|container| ContainerFit::Single(*container))
        .unwrap_or(ContainerFit::MultiContainer)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Recommendation {
    pub mode: LoadMode,
    pub container: ContainerFit,
    pub lcl_cost: f64,
    pub fcl_cost: f64,
}

pub fn recommend(total_cbm: f64, lcl_rate_per_cbm: f64, fcl_rate: f64) -> Recommendation {
    let lcl_cost = total_cbm * lcl_rate_per_cbm;
    let mode = if total_cbm > 0.0 && lcl_cost > fcl_rate {
        LoadMode::Fcl
    } else {
        LoadMode::Lcl
    };

    Recommendation {
        mode,
        container: suggest_container(total_cbm),
        lcl_cost,
        fcl_cost: fcl_rate,
    }
}

/// The calculator's working list plus its global settings.
///
/// Always holds at least one package row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FreightSheet {
    pub display_unit: DimensionUnit,
    items: Vec<PackageItem>,
    pub lcl_rate_per_cbm: String,
    pub fcl_rate: String,
}

impl Default for FreightSheet {
    fn default() -> Self {
        let display_unit = DimensionUnit::default();
        Self {
            display_unit,
            items: vec![PackageItem::new(display_unit)],
            lcl_rate_per_cbm: DEFAULT_LCL_RATE_PER_CBM.to_string(),
            fcl_rate: DEFAULT_FCL_RATE.to_string(),
        }
    }
}

impl FreightSheet {
    pub fn items(&self) -> &[PackageItem] {
        &self.items
    }

    /// Appends an empty row in the current display unit and returns its id.
    pub fn add_item(&mut self) -> String {
        let item = PackageItem::new(self.display_unit);
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Removes a row; the last remaining row is never removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        if self.items.len() <= 1 {
            return false;
        }
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before != self.items.len()
    }

    pub fn update_item(&mut self, id: &str, field: PackageField, value: impl Into<String>) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            *item.field_mut(field) = value.into();
        }
    }

    /// Changes the unit for rows added from now on; existing rows keep theirs.
    pub fn set_display_unit(&mut self, unit: DimensionUnit) {
        self.display_unit = unit;
    }

    /// Restores the single-row invariant after deserializing foreign data.
    pub fn normalized(mut self) -> Self {
        if self.items.is_empty() {
            self.items.push(PackageItem::new(self.display_unit));
        }
        self
    }

    pub fn totals(&self) -> FreightTotals {
        totals(&self.items)
    }

    pub fn chargeable_weights(&self) -> Vec<ChargeableWeight> {
        chargeable_weights(&self.totals())
    }

    pub fn recommendation(&self) -> Recommendation {
        recommend(
            self.totals().total_cbm,
            parse_number(&self.lcl_rate_per_cbm),
            parse_number(&self.fcl_rate),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(sheet: &mut FreightSheet, id: &str, side: &str) {
        sheet.update_item(id, PackageField::Length, side);
        sheet.update_item(id, PackageField::Width, side);
        sheet.update_item(id, PackageField::Height, side);
    }

    #[test]
    fn three_cubic_metres_in_meters() {
        let mut sheet = FreightSheet {
            display_unit: DimensionUnit::Meter,
            items: vec![PackageItem::new(DimensionUnit::Meter)],
            ..FreightSheet::default()
        };
        let ids = vec![
            sheet.items()[0].id.clone(),
            sheet.add_item(),
            sheet.add_item(),
        ];
        for id in &ids {
            cube(&mut sheet, id, "1");
        }

        let totals = sheet.totals();
        assert!((totals.total_cbm - 3.0).abs() < 1e-12);
        assert!((totals.total_cft - 105.9441).abs() < 1e-3);
    }

    #[test]
    fn units_convert_to_metres() {
        let mut item = PackageItem::new(DimensionUnit::Centimeter);
        item.length = "100".into();
        item.width = "50".into();
        item.height = "20".into();
        item.quantity = "2".into();
        assert!((item.volume_cbm() - 0.2).abs() < 1e-12);
        assert_eq!(item.input_volume(), 200_000.0);

        item.unit = DimensionUnit::Inch;
        item.length = "10".into();
        item.width = "10".into();
        item.height = "10".into();
        item.quantity = "1".into();
        assert!((item.volume_cbm() - 0.016387064).abs() < 1e-9);
    }

    #[test]
    fn non_numeric_fields_count_as_zero() {
        let mut item = PackageItem::new(DimensionUnit::Meter);
        item.length = "abc".into();
        item.width = "2".into();
        item.height = "2".into();
        item.weight_per_pkg = "heavy".into();
        assert_eq!(item.volume_cbm(), 0.0);
        assert_eq!(item.weight_kg(), 0.0);
    }

    #[test]
    fn air_chargeable_weight_uses_volumetric_when_larger() {
        let weight = chargeable_weight(1.0, 50.0, TransportMode::Air);
        assert_eq!(weight.volumetric_kg, 167.0);
        assert_eq!(weight.chargeable_kg, 167.0);

        let heavy = chargeable_weight(1.0, 2000.0, TransportMode::Sea);
        assert_eq!(heavy.chargeable_kg, 2000.0);
    }

    #[test]
    fn removing_last_item_is_a_noop() {
        let mut sheet = FreightSheet::default();
        let only = sheet.items()[0].id.clone();
        assert!(!sheet.remove_item(&only));
        assert_eq!(sheet.items().len(), 1);

        let second = sheet.add_item();
        assert!(sheet.remove_item(&only));
        assert_eq!(sheet.items().len(), 1);
        assert!(!sheet.remove_item(&second));
        assert_eq!(sheet.items()[0].id, second);
    }

    #[test]
    fn new_rows_use_display_unit() {
        let mut sheet = FreightSheet::default();
        sheet.set_display_unit(DimensionUnit::Inch);
        let id = sheet.add_item();
        let item = sheet.items().iter().find(|item| item.id == id).unwrap();
        assert_eq!(item.unit, DimensionUnit::Inch);
        assert_eq!(sheet.items()[0].unit, DimensionUnit::Centimeter);
    }

    #[test]
    fn container_suggestion_picks_smallest_fit() {
        assert_eq!(suggest_container(30.0).label(), "20' Standard");
        assert_eq!(suggest_container(33.0).label(), "20' Standard");
        assert_eq!(suggest_container(70.0).label(), "40' High Cube");
        assert_eq!(suggest_container(100.0), ContainerFit::MultiContainer);
    }

    #[test]
    fn lcl_versus_fcl() {
        assert_eq!(recommend(10.0, 60.0, 1200.0).mode, LoadMode::Lcl);
        let fcl = recommend(25.0, 60.0, 1200.0);
        assert_eq!(fcl.mode, LoadMode::Fcl);
        assert_eq!(fcl.lcl_cost, 1500.0);
        assert_eq!(recommend(0.0, 60.0, -1.0).mode, LoadMode::Lcl);
    }

    #[test]
    fn empty_deserialized_sheet_regains_a_row() {
        let json = r#"{"display_unit":"Meter","items":[],"lcl_rate_per_cbm":"60","fcl_rate":"1200"}"#;
        let sheet: FreightSheet = serde_json::from_str(json).unwrap();
        let sheet = sheet.normalized();
        assert_eq!(sheet.items().len(), 1);
        assert_eq!(sheet.items()[0].unit, DimensionUnit::Meter);
    }
}
