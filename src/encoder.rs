use crate::error::{HippoError, Result};
use crate::header::Header;
use crate::report::{PRODUCT_TITLE, ReportImage};

use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::{FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{StandardDataDictionary, tags, uids};
use log::{debug, info};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Generate a globally unique UID under the `2.25` (UUID-derived) root.
pub fn generate_uid() -> String {
    format!("2.25.{}", uuid::Uuid::new_v4().as_u128())
}

fn put_str(obj: &mut InMemDicomObject, tag: Tag, vr: VR, value: &str) {
    obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
}

fn put_u16(obj: &mut InMemDicomObject, tag: Tag, value: u16) {
    obj.put(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
}

/// Build the Secondary Capture object for a rendered report.
///
/// Every descriptive attribute of `header` is carried over; the SOP class,
/// series and instance identity, image pixel module, dates and annotation
/// flags are replaced.
///
/// # Errors
///
/// Returns [`HippoError::Encoding`] if the report bytes do not match three
/// 8-bit samples per pixel for its declared size.
pub fn build_report_object(
    header: &Header,
    report: &ReportImage,
) -> Result<FileDicomObject<InMemDicomObject>> {
    if report.as_raw().len() != report.expected_len() || report.expected_len() % 2 != 0 {
        // OB values must have even length.
        return Err(HippoError::Encoding(format!(
            "report is {}x{} RGB ({} bytes expected, even length required) but holds {} bytes",
            report.width(),
            report.height(),
            report.expected_len(),
            report.as_raw().len()
        )));
    }
    let rows = u16::try_from(report.height())
        .map_err(|_| HippoError::Encoding(format!("{} rows exceed 65535", report.height())))?;
    let columns = u16::try_from(report.width())
        .map_err(|_| HippoError::Encoding(format!("{} columns exceed 65535", report.width())))?;

    let series_instance_uid = generate_uid();
    let sop_instance_uid = generate_uid();
    let now = chrono::Local::now();
    let date = now.format("%Y%m%d").to_string();
    let time = now.format("%H%M%S").to_string();

    let mut dataset = header.descriptive().clone();

    put_str(&mut dataset, tags::SOP_CLASS_UID, VR::UI, uids::SECONDARY_CAPTURE_IMAGE_STORAGE);
    put_str(&mut dataset, tags::SERIES_INSTANCE_UID, VR::UI, &series_instance_uid);
    put_str(&mut dataset, tags::SOP_INSTANCE_UID, VR::UI, &sop_instance_uid);
    put_str(&mut dataset, tags::MODALITY, VR::CS, "OT");
    put_str(&mut dataset, tags::SERIES_DESCRIPTION, VR::LO, PRODUCT_TITLE);
    dataset.put(DataElement::new(
        tags::IMAGE_TYPE,
        VR::CS,
        PrimitiveValue::Strs(
            ["DERIVED", "PRIMARY", "AXIAL"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .into(),
        ),
    ));

    put_u16(&mut dataset, tags::ROWS, rows);
    put_u16(&mut dataset, tags::COLUMNS, columns);
    put_u16(&mut dataset, tags::SAMPLES_PER_PIXEL, ReportImage::SAMPLES_PER_PIXEL);
    put_str(&mut dataset, tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "RGB");
    // 0: colour-by-pixel, R1G1B1R2G2B2...
    put_u16(&mut dataset, tags::PLANAR_CONFIGURATION, 0);
    put_u16(&mut dataset, tags::BITS_ALLOCATED, ReportImage::BITS_PER_SAMPLE);
    put_u16(&mut dataset, tags::BITS_STORED, ReportImage::BITS_PER_SAMPLE);
    put_u16(&mut dataset, tags::HIGH_BIT, ReportImage::BITS_PER_SAMPLE - 1);
    put_u16(&mut dataset, tags::PIXEL_REPRESENTATION, 0);
    dataset.remove_element(tags::NUMBER_OF_FRAMES);

    put_str(&mut dataset, tags::STUDY_DATE, VR::DA, &date);
    put_str(&mut dataset, tags::STUDY_TIME, VR::TM, &time);
    put_str(&mut dataset, tags::SERIES_DATE, VR::DA, &date);
    put_str(&mut dataset, tags::SERIES_TIME, VR::TM, &time);
    put_str(&mut dataset, tags::IMAGES_IN_ACQUISITION, VR::IS, "1");

    // Empty window hints make viewers fall back to automatic window/level.
    dataset.put(DataElement::new(tags::WINDOW_CENTER, VR::DS, PrimitiveValue::Empty));
    dataset.put(DataElement::new(tags::WINDOW_WIDTH, VR::DS, PrimitiveValue::Empty));
    put_str(&mut dataset, tags::BURNED_IN_ANNOTATION, VR::CS, "YES");

    dataset.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from(report.as_raw().to_vec()),
    ));

    let meta = FileMetaTableBuilder::new()
        .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
        .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
        .media_storage_sop_instance_uid(sop_instance_uid.as_str())
        .build()
        .map_err(|e| HippoError::Encoding(e.to_string()))?;

    let mut file_object =
        FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, meta);
    for element in dataset {
        file_object.put(element);
    }

    debug!(
        "Built Secondary Capture {} in series {}",
        sop_instance_uid, series_instance_uid
    );
    Ok(file_object)
}

/// Encode the report and persist it at `path`.
///
/// The object is written to a temporary file next to `path` and renamed into
/// place only once fully written, so a failure never leaves a partial file at
/// `path`.
pub fn save_report_as_dicom(header: &Header, report: &ReportImage, path: &Path) -> Result<()> {
    let file_object = build_report_object(header, report)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let staging = NamedTempFile::new_in(parent)?;
    file_object
        .write_to_file(staging.path())
        .map_err(|e| HippoError::Encoding(e.to_string()))?;
    staging.persist(path).map_err(|e| HippoError::Io(e.error))?;

    info!("Wrote report to {}", path.display());
    Ok(())
}
