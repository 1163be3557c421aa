use hkjc_extract::{
    parse_horse_page, parse_horse_page_bytes, parse_race_result_page, parse_schedule_page, Error,
};

#[test]
fn blank_documents_are_rejected() {
    assert!(matches!(parse_horse_page(""), Err(Error::EmptyDocument)));
    assert!(matches!(
        parse_schedule_page("   \n\t  "),
        Err(Error::EmptyDocument)
    ));
    assert!(matches!(
        parse_race_result_page(""),
        Err(Error::EmptyDocument)
    ));
}

#[test]
fn pages_without_recognizable_content_extract_to_empty_results() {
    let html = "<html><body><div>nothing racing related here</div></body></html>";

    let horse = parse_horse_page(html).expect("parse");
    assert!(horse.basic_info.is_empty());
    assert!(horse.race_records.is_empty());

    let schedule = parse_schedule_page(html).expect("parse");
    assert!(schedule.race_days.is_empty());
    assert!(schedule.months.is_empty());

    let result = parse_race_result_page(html).expect("parse");
    assert!(result.race_info.is_empty());
    assert!(result.finishing_order.is_empty());
    assert!(result.pedigree.is_empty());
}

#[test]
fn truncated_markup_still_yields_partial_extraction() {
    let html = "<table><tr><td>馬主</td><td>:</td><td>陳大文</td><tr><td>練馬師";
    let page = parse_horse_page(html).expect("parse");
    assert_eq!(page.basic_info.get("owner"), Some("陳大文"));
}

#[test]
fn placeholder_values_never_reach_the_output() {
    let html = "<table>\
        <tr><td>馬主</td><td>:</td><td>--</td></tr>\
        <tr><td>性別</td><td>:</td><td>-</td></tr>\
        <tr><td>年齡</td><td>:</td><td>7</td></tr>\
        </table>";
    let page = parse_horse_page(html).expect("parse");
    assert_eq!(page.basic_info.get("owner"), None);
    assert_eq!(page.basic_info.get("sex"), None);
    assert_eq!(page.basic_info.get("age"), Some("7"));
}

#[test]
fn big5_bytes_are_transcoded_before_extraction() {
    // B0A8 A544 is Big5 for the label 馬主
    let mut html: Vec<u8> = Vec::new();
    html.extend_from_slice(b"<html><head><meta charset=\"big5\"></head><body><table><tr><td>");
    html.extend_from_slice(&[0xB0, 0xA8, 0xA5, 0x44]);
    html.extend_from_slice(b"</td><td>:</td><td>Smith</td></tr></table></body></html>");

    let page = parse_horse_page_bytes(&html).expect("parse");
    assert_eq!(page.basic_info.get("owner"), Some("Smith"));
}

#[test]
fn undecodable_bytes_degrade_to_replacement_characters() {
    let html = b"<html><body><p>\xFF\xFE broken</p></body></html>";
    let page = parse_horse_page_bytes(html).expect("parse");
    assert!(page.basic_info.is_empty());
}
