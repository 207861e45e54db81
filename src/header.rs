use dicom::core::Tag;
use dicom::core::header::Header as _;
use dicom::object::InMemDicomObject;
use dicom_dictionary_std::tags;

/// Attributes that describe the source pixel encoding rather than the study.
/// They are dropped so a derived object cannot inherit a contradicting
/// pixel contract.
const SOURCE_ENCODING_TAGS: [Tag; 13] = [
    tags::PIXEL_DATA,
    tags::RESCALE_INTERCEPT,
    tags::RESCALE_SLOPE,
    tags::RESCALE_TYPE,
    tags::MODALITY_LUT_SEQUENCE,
    tags::SMALLEST_IMAGE_PIXEL_VALUE,
    tags::LARGEST_IMAGE_PIXEL_VALUE,
    tags::PIXEL_PADDING_VALUE,
    tags::PIXEL_PADDING_RANGE_LIMIT,
    tags::VOILUT_SEQUENCE,
    tags::WINDOW_CENTER,
    tags::WINDOW_WIDTH,
    tags::WINDOW_CENTER_WIDTH_EXPLANATION,
];

/// Metadata snapshot of one slice, detached from its pixel payload.
///
/// Built once when a slice is read and never mutated afterwards. The typed
/// fields drive series selection, ordering and the report; the descriptive
/// dataset is what gets copied forward into the derived report object.
#[derive(Debug, Clone)]
pub struct Header {
    pub patient_id: String,
    pub patient_name: String,
    pub modality: String,
    pub study_instance_uid: String,
    pub study_description: String,
    pub series_instance_uid: String,
    pub series_description: String,
    pub sop_instance_uid: String,
    pub instance_number: i32,
    pub slice_thickness: Option<f64>,
    pub pixel_spacing: Vec<f64>,
    pub image_position: Vec<f64>,
    pub image_orientation: Vec<f64>,
    descriptive: InMemDicomObject,
}

impl Header {
    /// Extract a header from a decoded DICOM dataset.
    ///
    /// Missing string attributes become empty strings, missing geometry
    /// becomes empty lists. A slice without an Instance Number sorts as 0.
    pub fn from_object(obj: &InMemDicomObject) -> Self {
        let descriptive = InMemDicomObject::from_element_iter(
            obj.iter()
                .filter(|element| !SOURCE_ENCODING_TAGS.contains(&element.tag()))
                .cloned(),
        );

        Self {
            patient_id: string_value(obj, tags::PATIENT_ID),
            patient_name: string_value(obj, tags::PATIENT_NAME),
            modality: string_value(obj, tags::MODALITY),
            study_instance_uid: uid_value(obj, tags::STUDY_INSTANCE_UID),
            study_description: string_value(obj, tags::STUDY_DESCRIPTION),
            series_instance_uid: uid_value(obj, tags::SERIES_INSTANCE_UID),
            series_description: string_value(obj, tags::SERIES_DESCRIPTION),
            sop_instance_uid: uid_value(obj, tags::SOP_INSTANCE_UID),
            instance_number: obj
                .element(tags::INSTANCE_NUMBER)
                .ok()
                .and_then(|elem| elem.to_int::<i32>().ok())
                .unwrap_or(0),
            slice_thickness: obj
                .element(tags::SLICE_THICKNESS)
                .ok()
                .and_then(|elem| elem.to_float64().ok()),
            pixel_spacing: multi_float_value(obj, tags::PIXEL_SPACING),
            image_position: multi_float_value(obj, tags::IMAGE_POSITION_PATIENT),
            image_orientation: multi_float_value(obj, tags::IMAGE_ORIENTATION_PATIENT),
            descriptive,
        }
    }

    /// Every non-pixel attribute of the source slice.
    pub fn descriptive(&self) -> &InMemDicomObject {
        &self.descriptive
    }
}

fn string_value(obj: &InMemDicomObject, tag: Tag) -> String {
    obj.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

// UI values may carry a trailing NUL as padding.
fn uid_value(obj: &InMemDicomObject, tag: Tag) -> String {
    string_value(obj, tag)
        .trim_end_matches('\0')
        .to_string()
}

fn multi_float_value(obj: &InMemDicomObject, tag: Tag) -> Vec<f64> {
    obj.element(tag)
        .ok()
        .and_then(|elem| elem.to_multi_float64().ok())
        .unwrap_or_default()
}

/// Render a numeric list the way the report prints it, e.g. `[0.5, 0.5]`.
pub fn format_list(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}
