use lokal_client::ListingForm;
use lokal_location::ResolvedLocation;

/// Fills the location ids of a new listing from the page's resolved
/// location.
///
/// Only unset fields are filled, and only from canonical records. A
/// province-wide listing gets no municipality or barangay.
pub fn apply_location(form: &mut ListingForm, location: &ResolvedLocation) {
    if form.province.is_none() {
        form.province = location.province_record().map(|p| p.id);
    }
    if form.is_province_wide {
        form.municipality = None;
        form.barangay = None;
        return;
    }
    if form.municipality.is_none() {
        form.municipality = location.municipality_record().map(|m| m.id);
    }
    if form.barangay.is_none() && form.municipality.is_some() {
        form.barangay = location
            .barangay_record()
            .filter(|b| b.parent_id == form.municipality)
            .map(|b| b.id);
    }
}
