use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::object::{FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::{StandardDataDictionary, tags, uids};
use std::path::Path;

pub const STUDY_UID: &str = "1.2.826.0.1.3680043.8.498.1";

fn put_str(obj: &mut InMemDicomObject, tag: Tag, vr: VR, value: &str) {
    obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
}

fn put_u16(obj: &mut InMemDicomObject, tag: Tag, value: u16) {
    obj.put(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
}

/// Write one 16-bit MR slice of a square `size` with a bright disc in the middle.
pub fn write_mr_slice(
    dir: &Path,
    series_uid: &str,
    description: &str,
    instance_number: i32,
    size: u16,
) {
    let sop_instance_uid = format!("{series_uid}.{instance_number}");
    let centre = size as f32 / 2.0;
    let pixels: Vec<u16> = (0..size as usize * size as usize)
        .map(|i| {
            let (r, c) = ((i / size as usize) as f32, (i % size as usize) as f32);
            let distance = ((r - centre).powi(2) + (c - centre).powi(2)).sqrt();
            if distance < size as f32 / 6.0 {
                1000
            } else if distance < size as f32 / 3.0 {
                600
            } else {
                100 + instance_number as u16
            }
        })
        .collect();

    let mut obj = InMemDicomObject::new_empty();
    put_str(&mut obj, tags::SOP_CLASS_UID, VR::UI, uids::MR_IMAGE_STORAGE);
    put_str(&mut obj, tags::SOP_INSTANCE_UID, VR::UI, &sop_instance_uid);
    put_str(&mut obj, tags::STUDY_INSTANCE_UID, VR::UI, STUDY_UID);
    put_str(&mut obj, tags::SERIES_INSTANCE_UID, VR::UI, series_uid);
    put_str(&mut obj, tags::SERIES_DESCRIPTION, VR::LO, description);
    put_str(&mut obj, tags::STUDY_DESCRIPTION, VR::LO, "Brain MRI");
    put_str(&mut obj, tags::PATIENT_NAME, VR::PN, "Doe^Jane");
    put_str(&mut obj, tags::PATIENT_ID, VR::LO, "HIPPO-042");
    put_str(&mut obj, tags::MODALITY, VR::CS, "MR");
    put_str(&mut obj, tags::INSTANCE_NUMBER, VR::IS, &instance_number.to_string());
    put_str(&mut obj, tags::SLICE_THICKNESS, VR::DS, "1");
    obj.put(DataElement::new(
        tags::PIXEL_SPACING,
        VR::DS,
        PrimitiveValue::Strs(vec!["1".to_string(), "1".to_string()].into()),
    ));
    put_u16(&mut obj, tags::ROWS, size);
    put_u16(&mut obj, tags::COLUMNS, size);
    put_u16(&mut obj, tags::SAMPLES_PER_PIXEL, 1);
    put_str(&mut obj, tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2");
    put_u16(&mut obj, tags::BITS_ALLOCATED, 16);
    put_u16(&mut obj, tags::BITS_STORED, 16);
    put_u16(&mut obj, tags::HIGH_BIT, 15);
    put_u16(&mut obj, tags::PIXEL_REPRESENTATION, 0);
    obj.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OW,
        PrimitiveValue::U16(pixels.into()),
    ));

    let meta = FileMetaTableBuilder::new()
        .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
        .media_storage_sop_class_uid(uids::MR_IMAGE_STORAGE)
        .media_storage_sop_instance_uid(sop_instance_uid.as_str())
        .build()
        .unwrap();
    let mut file = FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, meta);
    for element in obj {
        file.put(element);
    }
    file.write_to_file(dir.join(format!("{sop_instance_uid}.dcm")))
        .unwrap();
}
