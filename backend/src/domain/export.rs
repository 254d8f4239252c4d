//! CSV export of the school roster.

use super::school::School;

/// Header row of the school export.
pub const SCHOOL_CSV_HEADER: [&str; 10] = [
    "ID",
    "Name",
    "Looma ID",
    "District",
    "Province",
    "Palika",
    "Status",
    "Headmaster",
    "Email",
    "Phone",
];

/// Render schools as CSV with CRLF line endings.
///
/// Fields containing commas, quotes or line breaks are quoted with embedded
/// quotes doubled.
///
/// # Examples
/// ```
/// use looma_backend::domain::schools_to_csv;
///
/// let csv = schools_to_csv(&[]);
/// assert_eq!(
///     csv,
///     "ID,Name,Looma ID,District,Province,Palika,Status,Headmaster,Email,Phone\r\n"
/// );
/// ```
pub fn schools_to_csv(schools: &[School]) -> String {
    let mut out = String::new();
    push_row(&mut out, SCHOOL_CSV_HEADER);
    for school in schools {
        let id = school.id.to_string();
        push_row(
            &mut out,
            [
                id.as_str(),
                school.name.as_str(),
                school.looma_id.as_str(),
                school.district.as_str(),
                school.province.as_str(),
                school.palika.as_str(),
                school.status.as_str(),
                school.contact.headmaster.as_str(),
                school.contact.email.as_str(),
                school.contact.phone.as_str(),
            ],
        );
    }
    out
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
