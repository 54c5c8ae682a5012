//! PDF rendering of inspection reports (US Letter, built-in Helvetica)

use chrono::{DateTime, Local};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::{
    error::{AppError, AppResult},
    models::{
        inspection::{Inspection, ItemResultDetail},
        trailer::Trailer,
        vehicle::Vehicle,
    },
};

const PAGE_WIDTH: Mm = Mm(215.9);
const PAGE_HEIGHT: Mm = Mm(279.4);
const MARGIN: f32 = 18.0;
const LINE: f32 = 5.5;

/// Fixed header fields printed on every report
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub company_name: String,
    pub contractor: String,
    pub contract: String,
}

/// Everything a report shows
#[derive(Debug)]
pub struct InspectionReport<'a> {
    pub header: &'a ReportHeader,
    pub inspection: &'a Inspection,
    pub vehicle: &'a Vehicle,
    pub trailer: Option<&'a Trailer>,
    pub driver_name: Option<&'a str>,
    pub place: Option<&'a str>,
    pub results: &'a [ItemResultDetail],
}

/// Writes lines top to bottom, starting a new page when the current one is full
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> AppResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT.0 - MARGIN,
            pages: 1,
        })
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self
            .doc
            .add_page(PAGE_WIDTH, PAGE_HEIGHT, format!("Layer {}", self.pages));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT.0 - MARGIN;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn text(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        self.ensure_room(LINE);
        self.text(text, size, MARGIN, bold);
        self.y -= LINE;
    }

    fn title(&mut self, text: &str) {
        self.ensure_room(LINE * 3.0);
        self.y -= LINE * 0.5;
        self.line(text, 12.0, true);
    }

    fn field(&mut self, label: &str, value: &str) {
        self.ensure_room(LINE);
        self.text(label, 9.5, MARGIN, true);
        self.text(value, 9.5, MARGIN + 48.0, false);
        self.y -= LINE;
    }

    /// Checklist row: item, result and observation columns
    fn row(&mut self, item: &str, result: &str, observation: &str, bold: bool) {
        self.ensure_room(LINE);
        self.text(&truncate(item, 60), 9.0, MARGIN + 4.0, bold);
        self.text(result, 9.0, MARGIN + 112.0, bold);
        self.text(&truncate(observation, 34), 9.0, MARGIN + 132.0, bold);
        self.y -= LINE;
    }

    fn skip(&mut self, lines: f32) {
        self.y -= LINE * lines;
    }

    fn finish(self) -> AppResult<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(e: printpdf::Error) -> AppError {
    AppError::Report(e.to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}

fn opt_to_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn local_time(at: &DateTime<chrono::Utc>) -> String {
    at.with_timezone(&Local).format("%d-%m-%Y %H:%M").to_string()
}

/// Render an inspection report to PDF bytes
pub fn render_inspection(report: &InspectionReport<'_>) -> AppResult<Vec<u8>> {
    let inspection = report.inspection;
    let vehicle = report.vehicle;

    let mut w = PageWriter::new(&format!("{} {}", inspection.inspection_type.label(), vehicle.plate))?;

    w.line(&report.header.company_name, 14.0, true);
    w.line(
        &format!("{} - {}", inspection.inspection_type.label().to_uppercase(), vehicle.plate),
        12.0,
        true,
    );
    w.skip(0.5);

    w.title("INFORMACION");
    w.field("Fecha de ingreso", &local_time(&inspection.entered_at));
    w.field(
        "Fecha de salida",
        &inspection.exited_at.as_ref().map(local_time).unwrap_or_else(|| "-".to_string()),
    );
    w.field("Lugar", or_dash(report.place));
    w.field("Mandante", &report.header.contractor);
    w.field("Contrato", &report.header.contract);
    w.field("Inspector", &inspection.inspector);
    w.field("Kilometraje", &format!("{} km", inspection.mileage_km));

    w.title("CONDUCTOR");
    w.field("Nombre", or_dash(report.driver_name));

    w.title("CAMION");
    w.field("Patente", &vehicle.plate);
    w.field("Marca", or_dash(vehicle.brand.as_deref()));
    w.field("Modelo", or_dash(vehicle.model.as_deref()));
    w.field("Año", &opt_to_string(vehicle.year));
    w.field("Tipo", &vehicle.vehicle_type);

    w.title("ESTANQUE / SEMIRREMOLQUE");
    match report.trailer {
        Some(trailer) => {
            w.field("Patente", &trailer.plate);
            w.field("Marca", or_dash(trailer.brand.as_deref()));
            w.field("Modelo", or_dash(trailer.model.as_deref()));
            w.field("Año", &opt_to_string(trailer.year));
            w.field("Capacidad", &opt_to_string(trailer.load_capacity.map(|c| format!("{} m3", c))));
        }
        None => w.line("Sin semirremolque asignado", 9.5, false),
    }

    w.new_page();
    w.line("LISTA DE VERIFICACION", 12.0, true);
    w.row("Item", "Estado", "Observacion", true);

    let mut current_category: Option<&str> = None;
    for result in report.results {
        if current_category != Some(result.category_name.as_str()) {
            w.title(&result.category_name);
            current_category = Some(result.category_name.as_str());
        }
        let name = if result.critical {
            format!("{} *", result.item_name)
        } else {
            result.item_name.clone()
        };
        w.row(&name, result.condition.as_str(), or_dash(result.observation.as_deref()), false);
    }
    w.skip(0.5);
    w.line("* Item critico. B: Bueno, R: Regular, M: Malo", 8.0, false);

    w.title("RESULTADO");
    w.field(
        "Apto para operar",
        if inspection.fit_for_operation { "SI" } else { "NO" },
    );
    w.field("Cambio de aceite", if inspection.oil_renewed { "SI" } else { "NO" });
    w.field("Observaciones", or_dash(inspection.observations.as_deref()));

    w.ensure_room(LINE * 6.0);
    w.skip(4.0);
    w.text("______________________", 9.5, MARGIN, false);
    w.text("______________________", 9.5, MARGIN + 100.0, false);
    w.skip(1.0);
    w.text("Firma inspector", 9.0, MARGIN, false);
    w.text("Firma conductor", 9.0, MARGIN + 100.0, false);

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{InspectionType, ItemCondition, OperationalRole, Workshop};
    use chrono::Utc;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: 1,
            company_id: None,
            plate: "BBCL12".to_string(),
            vin: None,
            brand: Some("Volvo".to_string()),
            model: Some("FH".to_string()),
            year: Some(2019),
            vehicle_type: "Tracto".to_string(),
            cargo_type: None,
            operational_role: OperationalRole::Titular,
            capacity_m3: 30,
            workshop: Workshop::Zmc,
            maintenance_interval_km: 25_000,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn inspection() -> Inspection {
        Inspection {
            id: 7,
            inspection_type: InspectionType::Diaria,
            vehicle_id: 1,
            trailer_id: None,
            mileage_km: 120_000,
            entered_at: Utc::now(),
            exited_at: None,
            inspector: "J. Soto".to_string(),
            observations: None,
            fit_for_operation: true,
            oil_renewed: false,
            maintenance_id: None,
            report_id: None,
            created_at: Utc::now(),
        }
    }

    fn header() -> ReportHeader {
        ReportHeader {
            company_name: "Transportes Demo".to_string(),
            contractor: "Mandante".to_string(),
            contract: "C-1".to_string(),
        }
    }

    #[test]
    fn test_render_produces_pdf() {
        let header = header();
        let vehicle = vehicle();
        let inspection = inspection();
        let results: Vec<ItemResultDetail> = (0..80)
            .map(|i| ItemResultDetail {
                item_id: i,
                item_name: format!("Item {}", i),
                category_name: format!("Categoria {}", i / 20),
                category_order: i / 20,
                critical: i % 7 == 0,
                condition: ItemCondition::Bueno,
                observation: None,
            })
            .collect();

        let bytes = render_inspection(&InspectionReport {
            header: &header,
            inspection: &inspection,
            vehicle: &vehicle,
            trailer: None,
            driver_name: Some("Pedro Rojas"),
            place: Some("Base Norte"),
            results: &results,
        })
        .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long observation", 9), "a long...");
    }
}
