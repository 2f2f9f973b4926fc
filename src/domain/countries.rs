//! Country Registry
//!
//! Static ISO 3166-1 alpha-2 table and the process-wide registry built from
//! it. The registry is computed once on first use and never mutated.

use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Code the API returns when a visitor cannot be located (VPN, proxy, bogon).
pub const UNKNOWN_COUNTRY_CODE: &str = "XX";

/// Metadata for one country, owned by the registry.
#[derive(Debug)]
pub struct CountryRecord {
    pub code: &'static str,
    pub name: &'static str,
    pub emoji_flag: String,
    pub currency_code: &'static str,
    pub currency_symbol: &'static str,
    /// Symbol as shown to the visitor, e.g. `USD$` or `CHF`.
    pub currency_localized: String,
}

// (code, name, currency code, currency symbol)
const COUNTRY_TABLE: &[(&str, &str, &str, &str)] = &[
    ("AC", "Ascension Island", "SHP", "£"),
    ("AD", "Andorra", "EUR", "€"),
    ("AE", "United Arab Emirates", "AED", "د.إ"),
    ("AF", "Afghanistan", "AFN", "؋"),
    ("AG", "Antigua and Barbuda", "XCD", "$"),
    ("AI", "Anguilla", "XCD", "$"),
    ("AL", "Albania", "ALL", "L"),
    ("AM", "Armenia", "AMD", "֏"),
    ("AO", "Angola", "AOA", "Kz"),
    ("AQ", "Antarctica", "USD", "$"),
    ("AR", "Argentina", "ARS", "$"),
    ("AS", "American Samoa", "USD", "$"),
    ("AT", "Austria", "EUR", "€"),
    ("AU", "Australia", "AUD", "$"),
    ("AW", "Aruba", "AWG", "ƒ"),
    ("AX", "Åland Islands", "EUR", "€"),
    ("AZ", "Azerbaijan", "AZN", "₼"),
    ("BA", "Bosnia and Herzegovina", "BAM", "KM"),
    ("BB", "Barbados", "BBD", "$"),
    ("BD", "Bangladesh", "BDT", "৳"),
    ("BE", "Belgium", "EUR", "€"),
    ("BF", "Burkina Faso", "XOF", "Fr"),
    ("BG", "Bulgaria", "BGN", "лв"),
    ("BH", "Bahrain", "BHD", ".د.ب"),
    ("BI", "Burundi", "BIF", "Fr"),
    ("BJ", "Benin", "XOF", "Fr"),
    ("BL", "Saint Barthélemy", "EUR", "€"),
    ("BM", "Bermuda", "BMD", "$"),
    ("BN", "Brunei", "BND", "$"),
    ("BO", "Bolivia", "BOB", "Bs."),
    ("BQ", "Caribbean Netherlands", "USD", "$"),
    ("BR", "Brazil", "BRL", "R$"),
    ("BS", "Bahamas", "BSD", "$"),
    ("BT", "Bhutan", "BTN", "Nu."),
    ("BV", "Bouvet Island", "NOK", "kr"),
    ("BW", "Botswana", "BWP", "P"),
    ("BY", "Belarus", "BYN", "Br"),
    ("BZ", "Belize", "BZD", "$"),
    ("CA", "Canada", "CAD", "$"),
    ("CC", "Cocos (Keeling) Islands", "AUD", "$"),
    ("CD", "DR Congo", "CDF", "FC"),
    ("CF", "Central African Republic", "XAF", "Fr"),
    ("CG", "Republic of the Congo", "XAF", "Fr"),
    ("CH", "Switzerland", "CHF", "CHF"),
    ("CI", "Ivory Coast", "XOF", "Fr"),
    ("CK", "Cook Islands", "NZD", "$"),
    ("CL", "Chile", "CLP", "$"),
    ("CM", "Cameroon", "XAF", "Fr"),
    ("CN", "China", "CNY", "¥"),
    ("CO", "Colombia", "COP", "$"),
    ("CR", "Costa Rica", "CRC", "₡"),
    ("CU", "Cuba", "CUP", "$"),
    ("CV", "Cape Verde", "CVE", "Esc"),
    ("CW", "Curaçao", "ANG", "ƒ"),
    ("CX", "Christmas Island", "AUD", "$"),
    ("CY", "Cyprus", "EUR", "€"),
    ("CZ", "Czechia", "CZK", "Kč"),
    ("DE", "Germany", "EUR", "€"),
    ("DJ", "Djibouti", "DJF", "Fr"),
    ("DK", "Denmark", "DKK", "kr"),
    ("DM", "Dominica", "XCD", "$"),
    ("DO", "Dominican Republic", "DOP", "$"),
    ("DZ", "Algeria", "DZD", "د.ج"),
    ("EC", "Ecuador", "USD", "$"),
    ("EE", "Estonia", "EUR", "€"),
    ("EG", "Egypt", "EGP", "£"),
    ("EH", "Western Sahara", "MAD", "د.م."),
    ("ER", "Eritrea", "ERN", "Nfk"),
    ("ES", "Spain", "EUR", "€"),
    ("ET", "Ethiopia", "ETB", "Br"),
    ("FI", "Finland", "EUR", "€"),
    ("FJ", "Fiji", "FJD", "$"),
    ("FK", "Falkland Islands", "FKP", "£"),
    ("FM", "Micronesia", "USD", "$"),
    ("FO", "Faroe Islands", "DKK", "kr"),
    ("FR", "France", "EUR", "€"),
    ("GA", "Gabon", "XAF", "Fr"),
    ("GB", "United Kingdom", "GBP", "£"),
    ("GD", "Grenada", "XCD", "$"),
    ("GE", "Georgia", "GEL", "₾"),
    ("GF", "French Guiana", "EUR", "€"),
    ("GG", "Guernsey", "GBP", "£"),
    ("GH", "Ghana", "GHS", "₵"),
    ("GI", "Gibraltar", "GIP", "£"),
    ("GL", "Greenland", "DKK", "kr."),
    ("GM", "Gambia", "GMD", "D"),
    ("GN", "Guinea", "GNF", "Fr"),
    ("GP", "Guadeloupe", "EUR", "€"),
    ("GQ", "Equatorial Guinea", "XAF", "Fr"),
    ("GR", "Greece", "EUR", "€"),
    ("GS", "South Georgia", "SHP", "£"),
    ("GT", "Guatemala", "GTQ", "Q"),
    ("GU", "Guam", "USD", "$"),
    ("GW", "Guinea-Bissau", "XOF", "Fr"),
    ("GY", "Guyana", "GYD", "$"),
    ("HK", "Hong Kong", "HKD", "$"),
    ("HM", "Heard Island and McDonald Islands", "AUD", "$"),
    ("HN", "Honduras", "HNL", "L"),
    ("HR", "Croatia", "EUR", "€"),
    ("HT", "Haiti", "HTG", "G"),
    ("HU", "Hungary", "HUF", "Ft"),
    ("ID", "Indonesia", "IDR", "Rp"),
    ("IE", "Ireland", "EUR", "€"),
    ("IL", "Israel", "ILS", "₪"),
    ("IM", "Isle of Man", "GBP", "£"),
    ("IN", "India", "INR", "₹"),
    ("IO", "British Indian Ocean Territory", "USD", "$"),
    ("IQ", "Iraq", "IQD", "ع.د"),
    ("IR", "Iran", "IRR", "﷼"),
    ("IS", "Iceland", "ISK", "kr"),
    ("IT", "Italy", "EUR", "€"),
    ("JE", "Jersey", "GBP", "£"),
    ("JM", "Jamaica", "JMD", "$"),
    ("JO", "Jordan", "JOD", "د.ا"),
    ("JP", "Japan", "JPY", "¥"),
    ("KE", "Kenya", "KES", "Sh"),
    ("KG", "Kyrgyzstan", "KGS", "с"),
    ("KH", "Cambodia", "KHR", "៛"),
    ("KI", "Kiribati", "AUD", "$"),
    ("KM", "Comoros", "KMF", "Fr"),
    ("KN", "Saint Kitts and Nevis", "XCD", "$"),
    ("KP", "North Korea", "KPW", "₩"),
    ("KR", "South Korea", "KRW", "₩"),
    ("KW", "Kuwait", "KWD", "د.ك"),
    ("KY", "Cayman Islands", "KYD", "$"),
    ("KZ", "Kazakhstan", "KZT", "₸"),
    ("LA", "Laos", "LAK", "₭"),
    ("LB", "Lebanon", "LBP", "ل.ل"),
    ("LC", "Saint Lucia", "XCD", "$"),
    ("LI", "Liechtenstein", "CHF", "Fr"),
    ("LK", "Sri Lanka", "LKR", "Rs"),
    ("LR", "Liberia", "LRD", "$"),
    ("LS", "Lesotho", "LSL", "L"),
    ("LT", "Lithuania", "EUR", "€"),
    ("LU", "Luxembourg", "EUR", "€"),
    ("LV", "Latvia", "EUR", "€"),
    ("LY", "Libya", "LYD", "ل.د"),
    ("MA", "Morocco", "MAD", "د.م."),
    ("MC", "Monaco", "EUR", "€"),
    ("MD", "Moldova", "MDL", "L"),
    ("ME", "Montenegro", "EUR", "€"),
    ("MF", "Saint Martin", "EUR", "€"),
    ("MG", "Madagascar", "MGA", "Ar"),
    ("MH", "Marshall Islands", "USD", "$"),
    ("MK", "North Macedonia", "MKD", "ден"),
    ("ML", "Mali", "XOF", "Fr"),
    ("MM", "Myanmar", "MMK", "Ks"),
    ("MN", "Mongolia", "MNT", "₮"),
    ("MO", "Macau", "MOP", "P"),
    ("MP", "Northern Mariana Islands", "USD", "$"),
    ("MQ", "Martinique", "EUR", "€"),
    ("MR", "Mauritania", "MRU", "UM"),
    ("MS", "Montserrat", "XCD", "$"),
    ("MT", "Malta", "EUR", "€"),
    ("MU", "Mauritius", "MUR", "₨"),
    ("MV", "Maldives", "MVR", ".ރ"),
    ("MW", "Malawi", "MWK", "MK"),
    ("MX", "Mexico", "MXN", "$"),
    ("MY", "Malaysia", "MYR", "RM"),
    ("MZ", "Mozambique", "MZN", "MT"),
    ("NA", "Namibia", "NAD", "$"),
    ("NC", "New Caledonia", "XPF", "₣"),
    ("NE", "Niger", "XOF", "Fr"),
    ("NF", "Norfolk Island", "AUD", "$"),
    ("NG", "Nigeria", "NGN", "₦"),
    ("NI", "Nicaragua", "NIO", "C$"),
    ("NL", "Netherlands", "EUR", "€"),
    ("NO", "Norway", "NOK", "kr"),
    ("NP", "Nepal", "NPR", "₨"),
    ("NR", "Nauru", "AUD", "$"),
    ("NU", "Niue", "NZD", "$"),
    ("NZ", "New Zealand", "NZD", "$"),
    ("OM", "Oman", "OMR", "ر.ع."),
    ("PA", "Panama", "PAB", "B/."),
    ("PE", "Peru", "PEN", "S/."),
    ("PF", "French Polynesia", "XPF", "₣"),
    ("PG", "Papua New Guinea", "PGK", "K"),
    ("PH", "Philippines", "PHP", "₱"),
    ("PK", "Pakistan", "PKR", "₨"),
    ("PL", "Poland", "PLN", "zł"),
    ("PM", "Saint Pierre and Miquelon", "EUR", "€"),
    ("PN", "Pitcairn Islands", "NZD", "$"),
    ("PR", "Puerto Rico", "USD", "$"),
    ("PS", "Palestine", "ILS", "₪"),
    ("PT", "Portugal", "EUR", "€"),
    ("PW", "Palau", "USD", "$"),
    ("PY", "Paraguay", "PYG", "₲"),
    ("QA", "Qatar", "QAR", "ر.ق"),
    ("RE", "Réunion", "EUR", "€"),
    ("RO", "Romania", "RON", "lei"),
    ("RS", "Serbia", "RSD", "дин."),
    ("RU", "Russia", "RUB", "₽"),
    ("RW", "Rwanda", "RWF", "Fr"),
    ("SA", "Saudi Arabia", "SAR", "ر.س"),
    ("SB", "Solomon Islands", "SBD", "$"),
    ("SC", "Seychelles", "SCR", "₨"),
    ("SD", "Sudan", "SDG", "ج.س."),
    ("SE", "Sweden", "SEK", "kr"),
    ("SG", "Singapore", "SGD", "$"),
    ("SH", "Saint Helena", "SHP", "£"),
    ("SI", "Slovenia", "EUR", "€"),
    ("SJ", "Svalbard and Jan Mayen", "NOK", "kr"),
    ("SK", "Slovakia", "EUR", "€"),
    ("SL", "Sierra Leone", "SLE", "Le"),
    ("SM", "San Marino", "EUR", "€"),
    ("SN", "Senegal", "XOF", "Fr"),
    ("SO", "Somalia", "SOS", "Sh"),
    ("SR", "Suriname", "SRD", "$"),
    ("SS", "South Sudan", "SSP", "£"),
    ("ST", "São Tomé and Príncipe", "STN", "Db"),
    ("SV", "El Salvador", "USD", "$"),
    ("SX", "Sint Maarten", "ANG", "ƒ"),
    ("SY", "Syria", "SYP", "£"),
    ("SZ", "Eswatini", "SZL", "L"),
    ("TA", "Tristan da Cunha", "SHP", "£"),
    ("TC", "Turks and Caicos Islands", "USD", "$"),
    ("TD", "Chad", "XAF", "Fr"),
    ("TF", "French Southern and Antarctic Lands", "EUR", "€"),
    ("TG", "Togo", "XOF", "Fr"),
    ("TH", "Thailand", "THB", "฿"),
    ("TJ", "Tajikistan", "TJS", "ЅМ"),
    ("TK", "Tokelau", "NZD", "$"),
    ("TL", "Timor-Leste", "USD", "$"),
    ("TM", "Turkmenistan", "TMT", "m"),
    ("TN", "Tunisia", "TND", "د.ت"),
    ("TO", "Tonga", "TOP", "T$"),
    ("TR", "Turkey", "TRY", "₺"),
    ("TT", "Trinidad and Tobago", "TTD", "$"),
    ("TV", "Tuvalu", "AUD", "$"),
    ("TW", "Taiwan", "TWD", "$"),
    ("TZ", "Tanzania", "TZS", "Sh"),
    ("UA", "Ukraine", "UAH", "₴"),
    ("UG", "Uganda", "UGX", "Sh"),
    ("UM", "United States Minor Outlying Islands", "USD", "$"),
    ("US", "United States of America", "USD", "$"),
    ("UY", "Uruguay", "UYU", "$"),
    ("UZ", "Uzbekistan", "UZS", "so'm"),
    ("VA", "Vatican City", "EUR", "€"),
    ("VC", "Saint Vincent and the Grenadines", "XCD", "$"),
    ("VE", "Venezuela", "VES", "Bs."),
    ("VG", "British Virgin Islands", "USD", "$"),
    ("VI", "United States Virgin Islands", "USD", "$"),
    ("VN", "Vietnam", "VND", "₫"),
    ("VU", "Vanuatu", "VUV", "Vt"),
    ("WF", "Wallis and Futuna", "XPF", "₣"),
    ("WS", "Samoa", "WST", "T"),
    ("XK", "Kosovo", "EUR", "€"),
    ("XX", "Unknown", "USD", "$"),
    ("YE", "Yemen", "YER", "﷼"),
    ("YT", "Mayotte", "EUR", "€"),
    ("ZA", "South Africa", "ZAR", "R"),
    ("ZM", "Zambia", "ZMW", "ZK"),
    ("ZW", "Zimbabwe", "ZWL", "$"),
];

// Currencies whose sign is unambiguous on its own, shown without the code.
const LOCALIZED_SYMBOLS: &[(&str, &str)] = &[
    ("AZN", "₼"),
    ("CRC", "₡"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("GEL", "₾"),
    ("ILS", "₪"),
    ("INR", "₹"),
    ("KRW", "₩"),
    ("KZT", "₸"),
    ("LAK", "₭"),
    ("MNT", "₮"),
    ("NGN", "₦"),
    ("PHP", "₱"),
    ("PYG", "₲"),
    ("THB", "฿"),
    ("TRY", "₺"),
    ("UAH", "₴"),
    ("VND", "₫"),
];

/// Process-wide registry, keyed by uppercase code.
pub fn countries() -> &'static BTreeMap<&'static str, CountryRecord> {
    static REGISTRY: OnceLock<BTreeMap<&'static str, CountryRecord>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        COUNTRY_TABLE
            .iter()
            .map(|&(code, name, currency_code, currency_symbol)| {
                let record = CountryRecord {
                    code,
                    name,
                    emoji_flag: emoji_flag(code),
                    currency_code,
                    currency_symbol,
                    currency_localized: localize_symbol(currency_code, currency_symbol),
                };
                (code, record)
            })
            .collect()
    })
}

/// Look up a record by an already-normalized (uppercase) code.
pub(crate) fn lookup(code: &str) -> Option<&'static CountryRecord> {
    countries().get(code)
}

/// Regional indicator pair for a two-letter code; a white flag for `XX`.
fn emoji_flag(code: &str) -> String {
    if code == UNKNOWN_COUNTRY_CODE {
        return "🏳".to_string();
    }
    code.chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

/// Unambiguous signs come from `LOCALIZED_SYMBOLS`. Anything else is
/// prefixed with the currency code unless the two already match.
fn localize_symbol(currency_code: &str, currency_symbol: &str) -> String {
    if let Some(&(_, localized)) = LOCALIZED_SYMBOLS.iter().find(|(code, _)| *code == currency_code) {
        localized.to_string()
    } else if currency_code == currency_symbol {
        currency_code.to_string()
    } else {
        format!("{}{}", currency_code, currency_symbol)
    }
}
