// Shared in-memory fixture: two scored regions (Muğla, Ankara) and one
// region listed only in the population table (Sinop).
#![allow(dead_code)]

use sector_scorer::{Dataset, Grid, MemorySource};

pub const SECTORS: [&str; 5] = [
    "Tarım, ormancılık ve balıkçılık",
    "Sanayi",
    "İnşaat",
    "Hizmetler",
    "Kamu yönetimi, eğitim, sağlık",
];

fn grid(rows: Vec<Vec<String>>) -> Grid {
    Grid::from_rows(rows)
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Current-price output; Muğla 2022 totals 1000 over the five sectors
pub fn nominal_output() -> Grid {
    let mut header = vec!["".to_string(), "İl".to_string(), "Yıl".to_string()];
    header.extend(SECTORS.iter().map(|s| s.to_string()));
    header.push("Vergi-Sübvansiyon".to_string());
    header.push("Gayrisafi yurt içi hasıla".to_string());

    grid(vec![
        row(&["Cari fiyatlarla il bazında gayrisafi katma değer"]),
        row(&["Bin TL"]),
        row(&["TRB Düzey2"]),
        header,
        row(&["1", "Muğla", "2021", "90", "200", "150", "250", "80", "40", "810"]),
        row(&["2", "Muğla", "2022", "150", "250", "200", "300", "100", "50", "1050"]),
        row(&["3", "Ankara", "2022", "50", "500", "300", "400", "250", "90", "1590"]),
    ])
}

/// Chain-linked volume growth; names at 3, 7, 11, ... and rates two columns later
pub fn real_growth() -> Grid {
    let width = 26;
    let blank = || vec![String::new(); width];

    let mut header = blank();
    for (i, name) in SECTORS.iter().chain(["Gayrisafi yurt içi hasıla"].iter()).enumerate() {
        header[3 + 4 * i] = name.to_string();
    }

    let data = |region: &str, year: &str, rates: [&str; 6]| {
        let mut r = blank();
        r[1] = region.to_string();
        r[2] = year.to_string();
        for (i, rate) in rates.iter().enumerate() {
            r[5 + 4 * i] = rate.to_string();
        }
        r
    };

    let mut rows = vec![blank(), blank(), blank(), header];
    rows.push(data("Muğla", "2020", ["50", "50", "50", "50", "50", "50"]));
    rows.push(data("Muğla", "2021", ["1", "4", "-2", "6", "1", "3"]));
    rows.push(data("Muğla", "2022", ["2", "5", "-1", "7", "1", "3"]));
    rows.push(data("Muğla", "2023", ["3", "6", "0", "8", "1", "3"]));
    rows.push(data("Ankara", "2021", ["0,5", "3", "2", "4", "2", "3"]));
    rows.push(data("Ankara", "2022", ["1,5", "3", "4", "4", "2", "3"]));
    rows.push(data("Ankara", "2023", ["2,5", "3", "6", "4", "2", "3"]));
    grid(rows)
}

pub fn agricultural_area() -> Grid {
    grid(vec![
        row(&["İl", "Toplam alan (da)"]),
        row(&["Konya", "20000000"]),
        row(&["Muğla", "3000000"]),
        row(&["Ankara", "2500000"]),
        row(&["Rize", "100000"]),
    ])
}

pub fn unemployment() -> Grid {
    grid(vec![
        row(&["Tablo", "İl", "Y2017", "Y2018", "Y2019", "Y2020", "Y2021", "Y2023"]),
        row(&["1", "Ankara", "", "", "", "", "", "11,2"]),
        row(&["2", "Muğla", "", "", "", "", "", "7,9"]),
        row(&["3", "İzmir", "", "", "", "", "", "13,4"]),
    ])
}

/// Monthly sales, one column per region; Muğla sells 400 a month in 2023
pub fn housing_sales() -> Grid {
    let mut rows = vec![
        row(&["Konut satış sayıları"]),
        row(&["Aylık"]),
        row(&["Yıl", "Ay", "Türkiye", "Muğla", "Ankara"]),
        row(&["2022", "Aralık", "100000", "999", "9999"]),
    ];
    for month in 1..=12 {
        let year = if month == 1 { "2023" } else { "" };
        rows.push(row(&[year, &format!("Ay {}", month), "90000", "400", "2000"]));
    }
    grid(rows)
}

pub fn foreign_housing_sales() -> Grid {
    grid(vec![
        row(&["Sıra", "İl", "Toplam"]),
        row(&["1", "Antalya", "20000"]),
        row(&["2", "Muğla", "1200"]),
    ])
}

/// 46-row block per region; total physicians at +16, nurses at +26, column Y
pub fn health_workforce() -> Grid {
    let mut rows = Vec::new();
    for (name, doctors, nurses) in [("Ankara", "15000", "20000"), ("Muğla", "1500", "4000")] {
        let mut block = vec![vec![String::new(); 25]; 46];
        block[0][0] = name.to_string();
        block[16][1] = "TOPLAM HEKİM".to_string();
        block[16][24] = doctors.to_string();
        block[26][1] = "HEMŞİRE".to_string();
        block[26][24] = nurses.to_string();
        rows.extend(block);
    }
    grid(rows)
}

/// Names on row 2 from column E, totals on row 3
pub fn population() -> Grid {
    grid(vec![
        row(&["Nüfus"]),
        row(&["2023"]),
        row(&["", "", "", "", "Ankara", "Muğla", "Sinop"]),
        row(&["Toplam", "Toplam", "Toplam", "Toplam", "5000000", "1000000", "220000"]),
    ])
}

pub fn renewable_suggestions() -> Grid {
    grid(vec![
        row(&["No", "İl", "Öneri 1", "Gerekçe 1", "Öneri 2", "Gerekçe 2", "Öneri 3", "Gerekçe 3"]),
        row(&[
            "1",
            "Muğla",
            "Güneş enerjisi",
            "Yüksek ışınım",
            "Rüzgar enerjisi",
            "Kıyı rüzgarı",
            "Jeotermal",
            "Fay hatları",
        ]),
    ])
}

/// Every dataset
pub fn full_source() -> MemorySource {
    MemorySource::new()
        .with(Dataset::NominalOutput, nominal_output())
        .with(Dataset::RealGrowth, real_growth())
        .with(Dataset::AgriculturalArea, agricultural_area())
        .with(Dataset::Unemployment, unemployment())
        .with(Dataset::HousingSales, housing_sales())
        .with(Dataset::ForeignHousingSales, foreign_housing_sales())
        .with(Dataset::HealthWorkforce, health_workforce())
        .with(Dataset::Population, population())
        .with(Dataset::RenewableSuggestions, renewable_suggestions())
}

/// Only the two core tables and population
pub fn core_source() -> MemorySource {
    MemorySource::new()
        .with(Dataset::NominalOutput, nominal_output())
        .with(Dataset::RealGrowth, real_growth())
        .with(Dataset::Population, population())
}
