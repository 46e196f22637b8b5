/// Known World Manufacturer Identifiers, sorted by WMI.
const WMI_MAKES: &[(&str, &str)] = &[
    ("1B3", "Dodge"),
    ("1C3", "Chrysler"),
    ("1C4", "Chrysler"),
    ("1C6", "Chrysler"),
    ("1D7", "Dodge"),
    ("1FA", "Ford"),
    ("1FD", "Ford"),
    ("1FM", "Ford"),
    ("1FT", "Ford"),
    ("1FU", "Freightliner"),
    ("1FV", "Freightliner"),
    ("1G1", "Chevrolet"),
    ("1G4", "Buick"),
    ("1G6", "Cadillac"),
    ("1GC", "Chevrolet"),
    ("1GM", "Pontiac"),
    ("1GT", "GMC"),
    ("1HD", "Harley-Davidson"),
    ("1HG", "Honda"),
    ("1J4", "Jeep"),
    ("1J8", "Jeep"),
    ("1L1", "Lincoln"),
    ("1LN", "Lincoln"),
    ("1M8", "Motor Coach Industries"),
    ("1ME", "Mercury"),
    ("1N4", "Nissan"),
    ("1N6", "Nissan"),
    ("1NX", "Toyota"),
    ("1VW", "Volkswagen"),
    ("1YV", "Mazda"),
    ("2C3", "Chrysler"),
    ("2FA", "Ford"),
    ("2G1", "Chevrolet"),
    ("2HG", "Honda"),
    ("2HK", "Honda"),
    ("2HM", "Hyundai"),
    ("2T1", "Toyota"),
    ("2T3", "Toyota"),
    ("3FA", "Ford"),
    ("3G1", "Chevrolet"),
    ("3GN", "Chevrolet"),
    ("3HG", "Honda"),
    ("3N1", "Nissan"),
    ("3VW", "Volkswagen"),
    ("4S3", "Subaru"),
    ("4S4", "Subaru"),
    ("4T1", "Toyota"),
    ("4T3", "Toyota"),
    ("4US", "BMW"),
    ("5FN", "Honda"),
    ("5J6", "Honda"),
    ("5N1", "Nissan"),
    ("5NP", "Hyundai"),
    ("5TD", "Toyota"),
    ("5UX", "BMW"),
    ("5XY", "Kia"),
    ("5YJ", "Tesla"),
    ("7SA", "Tesla"),
    ("JA3", "Mitsubishi"),
    ("JF1", "Subaru"),
    ("JF2", "Subaru"),
    ("JH4", "Acura"),
    ("JHM", "Honda"),
    ("JM1", "Mazda"),
    ("JN1", "Nissan"),
    ("JN8", "Nissan"),
    ("JT2", "Toyota"),
    ("JTD", "Toyota"),
    ("JTH", "Lexus"),
    ("JTJ", "Lexus"),
    ("KL1", "Chevrolet"),
    ("KM8", "Hyundai"),
    ("KMH", "Hyundai"),
    ("KNA", "Kia"),
    ("KND", "Kia"),
    ("SAJ", "Jaguar"),
    ("SAL", "Land Rover"),
    ("SCC", "Lotus"),
    ("SCF", "Aston Martin"),
    ("TRU", "Audi"),
    ("VF1", "Renault"),
    ("VF3", "Peugeot"),
    ("VF7", "Citroen"),
    ("WA1", "Audi"),
    ("WAU", "Audi"),
    ("WBA", "BMW"),
    ("WBS", "BMW M"),
    ("WDB", "Mercedes-Benz"),
    ("WDD", "Mercedes-Benz"),
    ("WMW", "MINI"),
    ("WP0", "Porsche"),
    ("WP1", "Porsche"),
    ("WVG", "Volkswagen"),
    ("WVW", "Volkswagen"),
    ("YS3", "Saab"),
    ("YV1", "Volvo"),
    ("ZAR", "Alfa Romeo"),
    ("ZFA", "Fiat"),
    ("ZFF", "Ferrari"),
    ("ZHW", "Lamborghini"),
];

/// Look up the manufacturer for a 3-character WMI, ignoring case.
pub fn make_from_wmi(wmi: &str) -> Option<&'static str> {
    if wmi.len() != 3 {
        return None;
    }
    let key = wmi.to_ascii_uppercase();
    WMI_MAKES
        .binary_search_by(|(prefix, _)| prefix.cmp(&key.as_str()))
        .ok()
        .map(|idx| WMI_MAKES[idx].1)
}
