/// One weather station point: the capital city of a province
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub province: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const fn city(province: &'static str, name: &'static str, lat: f64, lon: f64) -> City {
    City {
        province,
        name,
        lat,
        lon,
    }
}

/// Provincial capitals, one per Indonesian province, in display order
pub static CITIES: [City; 38] = [
    city("Aceh", "Banda Aceh", 5.5483, 95.3238),
    city("Sumatera Utara", "Medan", 3.5952, 98.6722),
    city("Sumatera Barat", "Padang", -0.9471, 100.4172),
    city("Riau", "Pekanbaru", 0.5071, 101.4478),
    city("Kepulauan Riau", "Tanjung Pinang", 0.9185, 104.4583),
    city("Jambi", "Jambi", -1.6101, 103.6131),
    city("Sumatera Selatan", "Palembang", -2.9761, 104.7754),
    city("Kepulauan Bangka Belitung", "Pangkal Pinang", -2.1291, 106.109),
    city("Bengkulu", "Bengkulu", -3.7956, 102.2608),
    city("Lampung", "Bandar Lampung", -5.3971, 105.2668),
    city("Banten", "Serang", -6.12, 106.1503),
    city("DKI Jakarta", "Jakarta", -6.2088, 106.8456),
    city("Jawa Barat", "Bandung", -6.9175, 107.6191),
    city("Jawa Tengah", "Semarang", -6.9667, 110.4167),
    city("DI Yogyakarta", "Yogyakarta", -7.7956, 110.3695),
    city("Jawa Timur", "Surabaya", -7.2575, 112.7521),
    city("Bali", "Denpasar", -8.6705, 115.2126),
    city("Nusa Tenggara Barat", "Mataram", -8.5833, 116.1167),
    city("Nusa Tenggara Timur", "Kupang", -10.1772, 123.5971),
    city("Kalimantan Barat", "Pontianak", -0.0263, 109.3425),
    city("Kalimantan Tengah", "Palangka Raya", -2.208, 113.9145),
    city("Kalimantan Selatan", "Banjarmasin", -3.3194, 114.5906),
    city("Kalimantan Timur", "Samarinda", -0.5022, 117.1536),
    city("Kalimantan Utara", "Tanjung Selor", 2.8401, 117.3731),
    city("Sulawesi Utara", "Manado", 1.4748, 124.8421),
    city("Sulawesi Tengah", "Palu", -0.8917, 119.8707),
    city("Sulawesi Selatan", "Makassar", -5.1477, 119.4327),
    city("Sulawesi Tenggara", "Kendari", -3.9985, 122.512),
    city("Gorontalo", "Gorontalo", 0.5467, 123.0595),
    city("Sulawesi Barat", "Mamuju", -2.6727, 118.8887),
    city("Maluku", "Ambon", -3.6954, 128.1814),
    city("Maluku Utara", "Ternate", 0.7893, 127.389),
    city("Papua", "Jayapura", -2.5489, 140.7182),
    city("Papua Barat", "Manokwari", -0.8619, 134.064),
    city("Papua Selatan", "Merauke", -8.4932, 140.4018),
    city("Papua Tengah", "Nabire", -3.3607, 135.503),
    city("Papua Pegunungan", "Wamena", -4.0939, 138.953),
    city("Papua Barat Daya", "Sorong", -0.8762, 131.2558),
];
