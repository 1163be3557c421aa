use hkjc_extract::{parse_horse_page, parse_horse_page_bytes, parse_horse_page_with_url, FieldId};

const HORSE_HTML: &str = r#"
<html>
<body>
    <h1>遨遊氣泡 (E436)</h1>
    <table>
        <tr><td>出生地 / 馬齡</td><td>:</td><td>AUS / 7</td></tr>
        <tr><td>毛色 / 性別</td><td>:</td><td>棗 / 閹</td></tr>
        <tr><td>進口類別</td><td>:</td><td>自購新馬</td></tr>
        <tr><td>現時評分</td><td>:</td><td>82</td></tr>
        <tr><td>季初評分</td><td>:</td><td>80</td></tr>
        <tr><td>練馬師</td><td>:</td><td><a href="/trainer?trainerid=YPF">容天鵬</a></td></tr>
        <tr><td>馬主</td><td>:</td><td>陳大文</td></tr>
    </table>
    <table>
        <tr>
            <td>日期</td><td>場地</td><td>跑道</td><td>距離</td><td>名次</td>
            <td>騎師</td><td>練馬師</td>
        </tr>
        <tr>
            <td>18/01/26</td><td>沙田</td><td>草地</td><td>1200</td><td>1</td>
            <td><a href="/jockey?jockeyid=PZ">潘頓</a></td>
            <td><a href="/trainer?trainerid=YPF">容天鵬</a></td>
        </tr>
        <tr>
            <td>04/01/26</td><td>跑馬地</td><td>草地</td><td>1200</td><td>3</td>
            <td>潘頓</td><td>容天鵬</td>
        </tr>
    </table>
    <table>
        <tr><td>B : 戴眼罩</td></tr>
        <tr><td>BO : 只戴單邊眼罩</td></tr>
        <tr><td>TT : 綁繫舌帶</td></tr>
    </table>
</body>
</html>
"#;

#[test]
fn name_and_code_come_from_the_heading() {
    let page = parse_horse_page(HORSE_HTML).expect("parse");
    assert_eq!(
        page.basic_info.get_field(FieldId::HorseName),
        Some("遨遊氣泡")
    );
    assert_eq!(page.basic_info.get_field(FieldId::HorseCode), Some("E436"));
}

#[test]
fn profile_table_resolves_and_splits_compound_rows() {
    let page = parse_horse_page(HORSE_HTML).expect("parse");
    let info = &page.basic_info;

    assert_eq!(info.get("birthplace"), Some("AUS"));
    assert_eq!(info.get("age"), Some("7"));
    assert_eq!(info.get("colour"), Some("棗"));
    assert_eq!(info.get("sex"), Some("閹"));
    assert_eq!(info.get("current_rating"), Some("82"));
    assert_eq!(info.get("season_start_rating"), Some("80"));
    assert_eq!(info.get("trainer"), Some("容天鵬"));
    assert_eq!(info.get("owner"), Some("陳大文"));
    // Unknown labels survive verbatim instead of being dropped
    assert_eq!(info.get("進口類別"), Some("自購新馬"));
}

#[test]
fn form_records_are_keyed_by_header_with_entity_ids() {
    let page = parse_horse_page(HORSE_HTML).expect("parse");
    assert_eq!(page.race_records.len(), 2);

    let first = &page.race_records[0];
    assert_eq!(first.get("date"), Some("18/01/26"));
    assert_eq!(first.get("venue"), Some("沙田"));
    assert_eq!(first.get("position"), Some("1"));
    assert_eq!(first.get("jockey"), Some("潘頓"));
    assert_eq!(first.get("jockey_id"), Some("PZ"));
    assert_eq!(first.get("trainer_id"), Some("YPF"));

    let second = &page.race_records[1];
    assert_eq!(second.get("venue"), Some("跑馬地"));
    assert_eq!(second.get("jockey_id"), None);
}

#[test]
fn equipment_legend_is_collected() {
    let page = parse_horse_page(HORSE_HTML).expect("parse");
    assert_eq!(page.equipment_legend.get("B"), Some("戴眼罩"));
    assert_eq!(page.equipment_legend.get("BO"), Some("只戴單邊眼罩"));
    assert_eq!(page.equipment_legend.get("TT"), Some("綁繫舌帶"));
}

#[test]
fn horse_id_comes_from_the_source_url() {
    let url = "https://racing.example.com/Horse.aspx?horseid=HK_2019_E436&Option=1";
    let page = parse_horse_page_with_url(HORSE_HTML, url).expect("parse");
    assert_eq!(page.horse_id.as_deref(), Some("HK_2019_E436"));
    assert_eq!(page.source_url.as_deref(), Some(url));

    let no_url = parse_horse_page(HORSE_HTML).expect("parse");
    assert_eq!(no_url.horse_id, None);
}

#[test]
fn bytes_entry_point_matches_str_entry_point() {
    let from_bytes = parse_horse_page_bytes(HORSE_HTML.as_bytes()).expect("parse");
    let from_str = parse_horse_page(HORSE_HTML).expect("parse");
    assert_eq!(
        from_bytes.basic_info.get("owner"),
        from_str.basic_info.get("owner")
    );
    assert_eq!(from_bytes.race_records.len(), from_str.race_records.len());
}
