//! Synthetic MR slices for unit tests.

use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::object::{FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{StandardDataDictionary, tags, uids};
use std::path::{Path, PathBuf};

fn put_str(obj: &mut InMemDicomObject, tag: dicom::core::Tag, vr: VR, value: &str) {
    obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
}

/// A 16-bit monochrome slice with the attributes a routed MR study carries.
pub fn slice_object(
    series_uid: &str,
    series_description: &str,
    instance_number: i32,
    rows: u16,
    columns: u16,
    pixels: &[u16],
) -> InMemDicomObject {
    let mut obj = InMemDicomObject::new_empty();
    put_str(&mut obj, tags::SOP_CLASS_UID, VR::UI, uids::MR_IMAGE_STORAGE);
    put_str(
        &mut obj,
        tags::SOP_INSTANCE_UID,
        VR::UI,
        &format!("{series_uid}.{instance_number}"),
    );
    put_str(&mut obj, tags::STUDY_INSTANCE_UID, VR::UI, "1.2.826.0.1.3680043.1");
    put_str(&mut obj, tags::SERIES_INSTANCE_UID, VR::UI, series_uid);
    put_str(&mut obj, tags::SERIES_DESCRIPTION, VR::LO, series_description);
    put_str(&mut obj, tags::STUDY_DESCRIPTION, VR::LO, "Brain MRI");
    put_str(&mut obj, tags::PATIENT_NAME, VR::PN, "Doe^Jane");
    put_str(&mut obj, tags::PATIENT_ID, VR::LO, "HIPPO-001");
    put_str(&mut obj, tags::MODALITY, VR::CS, "MR");
    put_str(&mut obj, tags::INSTANCE_NUMBER, VR::IS, &instance_number.to_string());
    put_str(&mut obj, tags::SLICE_THICKNESS, VR::DS, "1.5");
    obj.put(DataElement::new(
        tags::PIXEL_SPACING,
        VR::DS,
        PrimitiveValue::Strs(vec!["1.0".to_string(), "1.0".to_string()].into()),
    ));
    obj.put(DataElement::new(
        tags::IMAGE_POSITION_PATIENT,
        VR::DS,
        PrimitiveValue::Strs(
            vec![
                "0".to_string(),
                "0".to_string(),
                format!("{}", instance_number as f64 * 1.5),
            ]
            .into(),
        ),
    ));
    obj.put(DataElement::new(
        tags::IMAGE_ORIENTATION_PATIENT,
        VR::DS,
        PrimitiveValue::Strs(
            ["1", "0", "0", "0", "1", "0"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .into(),
        ),
    ));
    obj.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(rows)));
    obj.put(DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(columns)));
    obj.put(DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)));
    put_str(&mut obj, tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2");
    obj.put(DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)));
    obj.put(DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)));
    obj.put(DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)));
    obj.put(DataElement::new(
        tags::PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(0_u16),
    ));
    obj.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OW,
        PrimitiveValue::U16(pixels.to_vec().into()),
    ));
    obj
}

/// Persist a slice as an Explicit VR Little Endian file and return its path.
pub fn write_slice(dir: &Path, file_name: &str, obj: InMemDicomObject) -> PathBuf {
    let sop_instance_uid = obj
        .element(tags::SOP_INSTANCE_UID)
        .expect("fixture has a SOP Instance UID")
        .to_str()
        .expect("UID is a string")
        .to_string();
    let meta = FileMetaTableBuilder::new()
        .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
        .media_storage_sop_class_uid(uids::MR_IMAGE_STORAGE)
        .media_storage_sop_instance_uid(sop_instance_uid)
        .build()
        .expect("valid file meta");
    let mut file = FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, meta);
    for element in obj {
        file.put(element);
    }

    let path = dir.join(file_name);
    file.write_to_file(&path).expect("fixture written");
    path
}
