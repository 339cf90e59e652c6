use crate::models::MetadataRecord;

/// Renders one record as "<title> with an IMDb rating of <rating>"
pub fn segment(record: &MetadataRecord) -> String {
    format!(
        "{} with an IMDb rating of {}",
        record.title, record.audience_rating
    )
}

/// Joins the intro phrase with one comma-separated segment per record
///
/// Records are not validated; empty fields render as empty text.
pub fn assemble<'a, I>(intro: &str, records: I) -> String
where
    I: IntoIterator<Item = &'a MetadataRecord>,
{
    let segments: Vec<String> = records.into_iter().map(segment).collect();
    format!("{}{}", intro, segments.join(", "))
}

/// Intro phrase for recommendations based on `title`
pub fn recommendation_intro(title: &str) -> String {
    format!("If you enjoyed {} you might also enjoy watching ", title)
}
