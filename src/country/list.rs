/// Country offered by the picker: display name and ISO 3166 alpha-2 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub name: &'static str,
    pub code: &'static str,
}

impl Country {
    const fn new(name: &'static str, code: &'static str) -> Self {
        Self { name, code }
    }
}

/// Picker entries, most affected first.
pub static COUNTRIES: &[Country] = &[
    Country::new("USA", "US"),
    Country::new("Spain", "ES"),
    Country::new("Italy", "IT"),
    Country::new("France", "FR"),
    Country::new("Germany", "DE"),
    Country::new("UK", "GB"),
    Country::new("Turkey", "TR"),
    Country::new("Iran", "IR"),
    Country::new("Russia", "RU"),
    Country::new("Belgium", "BE"),
    Country::new("Brazil", "BR"),
    Country::new("Canada", "CA"),
    Country::new("Netherlands", "NL"),
    Country::new("Switzerland", "CH"),
    Country::new("Portugal", "PT"),
    Country::new("India", "IN"),
    Country::new("Ireland", "IE"),
    Country::new("Austria", "AT"),
    Country::new("Peru", "PE"),
    Country::new("Sweden", "SE"),
    Country::new("Japan", "JP"),
    Country::new("Chile", "CL"),
    Country::new("Saudi Arabia", "SA"),
    Country::new("Poland", "PL"),
    Country::new("Ecuador", "EC"),
    Country::new("Romania", "RO"),
    Country::new("Pakistan", "PK"),
    Country::new("Mexico", "MX"),
    Country::new("Denmark", "DK"),
    Country::new("Norway", "NO"),
    Country::new("UAE", "AE"),
    Country::new("Czechia", "CZ"),
    Country::new("Australia", "AU"),
    Country::new("Singapore", "SG"),
    Country::new("Indonesia", "ID"),
    Country::new("Serbia", "RS"),
    Country::new("Philippines", "PH"),
    Country::new("Ukraine", "UA"),
    Country::new("Qatar", "QA"),
    Country::new("Malaysia", "MY"),
    Country::new("Belarus", "BY"),
    Country::new("Dominican Republic", "DO"),
    Country::new("Panama", "PA"),
    Country::new("Finland", "FI"),
    Country::new("Colombia", "CO"),
    Country::new("Luxembourg", "LU"),
    Country::new("South Africa", "ZA"),
    Country::new("Egypt", "EG"),
    Country::new("Argentina", "AR"),
    Country::new("Morocco", "MA"),
    Country::new("Thailand", "TH"),
    Country::new("Algeria", "DZ"),
    Country::new("Moldova", "MD"),
    Country::new("Bangladesh", "BD"),
    Country::new("Greece", "GR"),
    Country::new("Hungary", "HU"),
    Country::new("Kuwait", "KW"),
    Country::new("Bahrain", "BH"),
    Country::new("Croatia", "HR"),
    Country::new("Iceland", "IS"),
    Country::new("Kazakhstan", "KZ"),
    Country::new("Uzbekistan", "UZ"),
    Country::new("Estonia", "EE"),
    Country::new("Iraq", "IQ"),
    Country::new("New Zealand", "NZ"),
    Country::new("Azerbaijan", "AZ"),
    Country::new("Slovenia", "SI"),
    Country::new("Lithuania", "LT"),
    Country::new("Armenia", "AM"),
    Country::new("Bosnia and Herzegovina", "BA"),
    Country::new("Oman", "OM"),
    Country::new("North Macedonia", "MK"),
    Country::new("Slovakia", "SK"),
    Country::new("Cuba", "CU"),
    Country::new("Hong Kong", "HK"),
    Country::new("Cameroon", "CM"),
    Country::new("Afghanistan", "AF"),
    Country::new("Bulgaria", "BG"),
    Country::new("Tunisia", "TN"),
    Country::new("Ghana", "GH"),
    Country::new("Ivory Coast", "CI"),
    Country::new("Cyprus", "CY"),
    Country::new("Djibouti", "DJ"),
    Country::new("Latvia", "LV"),
    Country::new("Andorra", "AD"),
    Country::new("Lebanon", "LB"),
    Country::new("Costa Rica", "CR"),
    Country::new("Niger", "NE"),
    Country::new("Burkina Faso", "BF"),
    Country::new("Albania", "AL"),
    Country::new("Kyrgyzstan", "KG"),
    Country::new("Nigeria", "NG"),
    Country::new("Bolivia", "BO"),
    Country::new("Guinea", "GN"),
    Country::new("Uruguay", "UY"),
    Country::new("Honduras", "HN"),
    Country::new("San Marino", "SM"),
    Country::new("Palestine", "PS"),
    Country::new("Malta", "MT"),
    Country::new("Taiwan", "TW"),
    Country::new("Jordan", "JO"),
    Country::new("Réunion", "RE"),
    Country::new("Georgia", "GE"),
    Country::new("Senegal", "SN"),
    Country::new("Mauritius", "MU"),
    Country::new("DRC", "CD"),
    Country::new("Montenegro", "ME"),
    Country::new("Isle of Man", "IM"),
    Country::new("Sri Lanka", "LK"),
    Country::new("Mayotte", "YT"),
    Country::new("Kenya", "KE"),
    Country::new("Vietnam", "VN"),
    Country::new("Guatemala", "GT"),
    Country::new("Venezuela", "VE"),
    Country::new("Mali", "ML"),
    Country::new("Paraguay", "PY"),
    Country::new("El Salvador", "SV"),
    Country::new("Jamaica", "JM"),
    Country::new("Tanzania", "TZ"),
    Country::new("Martinique", "MQ"),
    Country::new("Guadeloupe", "GP"),
    Country::new("Rwanda", "RW"),
    Country::new("Congo", "CG"),
    Country::new("Brunei", "BN"),
    Country::new("Somalia", "SO"),
    Country::new("Gibraltar", "GI"),
    Country::new("Cambodia", "KH"),
    Country::new("Madagascar", "MG"),
    Country::new("Trinidad and Tobago", "TT"),
    Country::new("Gabon", "GA"),
    Country::new("Myanmar", "MM"),
    Country::new("Ethiopia", "ET"),
    Country::new("Aruba", "AW"),
    Country::new("French Guiana", "GF"),
    Country::new("Monaco", "MC"),
    Country::new("Bermuda", "BM"),
    Country::new("Togo", "TG"),
    Country::new("Liechtenstein", "LI"),
    Country::new("Equatorial Guinea", "GQ"),
    Country::new("Liberia", "LR"),
    Country::new("Barbados", "BB"),
    Country::new("Sudan", "SD"),
    Country::new("Guyana", "GY"),
    Country::new("Zambia", "ZM"),
    Country::new("Cabo Verde", "CV"),
    Country::new("Cayman Islands", "KY"),
    Country::new("Bahamas", "BS"),
    Country::new("French Polynesia", "PF"),
    Country::new("Uganda", "UG"),
    Country::new("Maldives", "MV"),
    Country::new("Libya", "LY"),
    Country::new("Guinea-Bissau", "GW"),
    Country::new("Macao", "MO"),
    Country::new("Haiti", "HT"),
    Country::new("Syria", "SY"),
    Country::new("Eritrea", "ER"),
    Country::new("Mozambique", "MZ"),
    Country::new("Saint Martin", "MF"),
    Country::new("Benin", "BJ"),
    Country::new("Chad", "TD"),
    Country::new("Mongolia", "MN"),
    Country::new("Nepal", "NP"),
    Country::new("Sierra Leone", "SL"),
    Country::new("Zimbabwe", "ZW"),
    Country::new("Angola", "AO"),
    Country::new("Antigua and Barbuda", "AG"),
    Country::new("Eswatini", "SZ"),
    Country::new("Botswana", "BW"),
    Country::new("Timor-Leste", "TL"),
    Country::new("Belize", "BZ"),
    Country::new("New Caledonia", "NC"),
    Country::new("Malawi", "MW"),
    Country::new("Fiji", "FJ"),
    Country::new("Dominica", "DM"),
    Country::new("Namibia", "NA"),
    Country::new("Saint Lucia", "LC"),
    Country::new("Grenada", "GD"),
    Country::new("Saint Kitts and Nevis", "KN"),
    Country::new("CAR", "CF"),
    Country::new("St. Vincent Grenadines", "VC"),
    Country::new("Turks and Caicos", "TC"),
    Country::new("Falkland Islands", "FK"),
    Country::new("Greenland", "GL"),
    Country::new("Montserrat", "MS"),
    Country::new("Seychelles", "SC"),
    Country::new("Suriname", "SR"),
    Country::new("Nicaragua", "NI"),
    Country::new("Gambia", "GM"),
    Country::new("Vatican City", "VA"),
    Country::new("Mauritania", "MR"),
    Country::new("Papua New Guinea", "PG"),
    Country::new("St. Barth", "BL"),
    Country::new("Burundi", "BI"),
    Country::new("Bhutan", "BT"),
    Country::new("Caribbean Netherlands", "BQ"),
    Country::new("British Virgin Islands", "VG"),
    Country::new("Sao Tome and Principe", "ST"),
    Country::new("South Sudan", "SD"),
    Country::new("Anguilla", "AI"),
    Country::new("Saint Pierre Miquelon", "PM"),
    Country::new("Yemen", "YE"),
    Country::new("China", "CN"),
];

/// First country carrying `code`, compared case-insensitively.
#[must_use]
pub fn find_by_code(code: &str) -> Option<&'static Country> {
    COUNTRIES
        .iter()
        .find(|country| country.code.eq_ignore_ascii_case(code.trim()))
}

#[must_use]
pub fn find_by_name(name: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|country| country.name == name)
}

/// Countries whose name starts with `prefix`, ignoring case. An empty prefix
/// matches everything.
pub fn search(prefix: &str) -> impl Iterator<Item = &'static Country> + '_ {
    let prefix = prefix.to_uppercase();
    COUNTRIES
        .iter()
        .filter(move |country| country.name.to_uppercase().starts_with(&prefix))
}

/// Splits `items` into display columns of `ceil(len / columns)` entries;
/// the last column takes the remainder.
#[must_use]
pub fn partition_columns<T>(items: &[T], columns: usize) -> Vec<&[T]> {
    if items.is_empty() || columns == 0 {
        return Vec::new();
    }
    items.chunks(items.len().div_ceil(columns)).collect()
}
