//! Compiled-in location data: countries with their cities, territories,
//! regions and dependencies, climate-zone city lists and country centroids.
//!
//! Nothing here is mutable; every table is a `const`/`static`.

use tracing::trace;

use crate::model::{ClimateZone, Coordinates, Location, LocationKind};

#[derive(Debug)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new_unchecked(self.lat, self.lon)
    }
}

#[derive(Debug)]
pub struct Country {
    pub name: &'static str,
    pub code: &'static str,
    pub cities: &'static [City],
    pub territories: &'static [&'static str],
    pub regions: &'static [&'static str],
    pub dependencies: &'static [&'static str],
}

impl Country {
    pub fn centroid(&self) -> Coordinates {
        centroid_of(self.code)
    }

    fn location(&self, name: &str, coordinates: Coordinates, kind: LocationKind) -> Location {
        Location::new(name, coordinates, kind).with_country(self.name, Some(self.code))
    }
}

const fn city(name: &'static str, lat: f64, lon: f64) -> City {
    City { name, lat, lon }
}

static COUNTRIES: &[Country] = &[
    Country {
        name: "United States",
        code: "US",
        cities: &[
            city("New York", 40.7128, -74.0060),
            city("Los Angeles", 34.0522, -118.2437),
            city("Chicago", 41.8781, -87.6298),
            city("Houston", 29.7604, -95.3698),
            city("Phoenix", 33.4484, -112.0740),
            city("Miami", 25.7617, -80.1918),
            city("Seattle", 47.6062, -122.3321),
            city("San Francisco", 37.7749, -122.4194),
            city("San Diego", 32.7157, -117.1611),
            city("Las Vegas", 36.1699, -115.1398),
            city("Anchorage", 61.2181, -149.9003),
            city("Fairbanks", 64.8378, -147.7164),
            city("Honolulu", 21.3069, -157.8583),
        ],
        territories: &["Puerto Rico", "Guam", "U.S. Virgin Islands", "American Samoa"],
        regions: &["California", "Texas", "Florida", "Alaska", "New England"],
        dependencies: &["Northern Mariana Islands"],
    },
    Country {
        name: "Canada",
        code: "CA",
        cities: &[
            city("Toronto", 43.6532, -79.3832),
            city("Montreal", 45.5017, -73.5673),
            city("Vancouver", 49.2827, -123.1207),
            city("Ottawa", 45.4215, -75.6972),
            city("Yellowknife", 62.4540, -114.3718),
            city("Iqaluit", 63.7467, -68.5170),
        ],
        territories: &["Yukon", "Northwest Territories", "Nunavut"],
        regions: &["Ontario", "Quebec", "British Columbia", "Alberta"],
        dependencies: &[],
    },
    Country {
        name: "Mexico",
        code: "MX",
        cities: &[
            city("Mexico City", 19.4326, -99.1332),
            city("Guadalajara", 20.6597, -103.3496),
            city("Cancun", 21.1619, -86.8515),
        ],
        territories: &[],
        regions: &["Yucatan", "Baja California", "Oaxaca"],
        dependencies: &[],
    },
    Country {
        name: "Brazil",
        code: "BR",
        cities: &[
            city("Sao Paulo", -23.5505, -46.6333),
            city("Rio de Janeiro", -22.9068, -43.1729),
            city("Brasilia", -15.7939, -47.8828),
            city("Manaus", -3.1190, -60.0217),
        ],
        territories: &[],
        regions: &["Amazonas", "Bahia", "Minas Gerais"],
        dependencies: &[],
    },
    Country {
        name: "Argentina",
        code: "AR",
        cities: &[
            city("Buenos Aires", -34.6037, -58.3816),
            city("Cordoba", -31.4201, -64.1888),
            city("Ushuaia", -54.8019, -68.3030),
        ],
        territories: &[],
        regions: &["Patagonia", "Mendoza"],
        dependencies: &[],
    },
    Country {
        name: "United Kingdom",
        code: "GB",
        cities: &[
            city("London", 51.5074, -0.1278),
            city("Manchester", 53.4808, -2.2426),
            city("Edinburgh", 55.9533, -3.1883),
            city("Cardiff", 51.4816, -3.1791),
        ],
        territories: &[],
        regions: &["England", "Scotland", "Wales", "Northern Ireland"],
        dependencies: &["Gibraltar", "Bermuda", "Falkland Islands", "Cayman Islands"],
    },
    Country {
        name: "Ireland",
        code: "IE",
        cities: &[city("Dublin", 53.3498, -6.2603), city("Cork", 51.8985, -8.4756)],
        territories: &[],
        regions: &["Munster", "Leinster"],
        dependencies: &[],
    },
    Country {
        name: "France",
        code: "FR",
        cities: &[
            city("Paris", 48.8566, 2.3522),
            city("Marseille", 43.2965, 5.3698),
            city("Lyon", 45.7640, 4.8357),
            city("Nice", 43.7102, 7.2620),
        ],
        territories: &["French Guiana", "Reunion", "Martinique", "Guadeloupe"],
        regions: &["Brittany", "Provence", "Normandy", "Alsace"],
        dependencies: &["French Polynesia", "New Caledonia"],
    },
    Country {
        name: "Germany",
        code: "DE",
        cities: &[
            city("Berlin", 52.5200, 13.4050),
            city("Hamburg", 53.5511, 9.9937),
            city("Munich", 48.1351, 11.5820),
        ],
        territories: &[],
        regions: &["Bavaria", "Saxony", "Hesse"],
        dependencies: &[],
    },
    Country {
        name: "Netherlands",
        code: "NL",
        cities: &[
            city("Amsterdam", 52.3676, 4.9041),
            city("Rotterdam", 51.9244, 4.4777),
        ],
        territories: &[],
        regions: &["Holland", "Friesland"],
        dependencies: &["Aruba", "Curacao"],
    },
    Country {
        name: "Denmark",
        code: "DK",
        cities: &[city("Copenhagen", 55.6761, 12.5683), city("Nuuk", 64.1814, -51.6941)],
        territories: &[],
        regions: &["Jutland", "Zealand"],
        dependencies: &["Greenland", "Faroe Islands"],
    },
    Country {
        name: "Norway",
        code: "NO",
        cities: &[
            city("Oslo", 59.9139, 10.7522),
            city("Bergen", 60.3913, 5.3221),
            city("Tromso", 69.6492, 18.9553),
            city("Longyearbyen", 78.2232, 15.6267),
        ],
        territories: &["Svalbard", "Jan Mayen"],
        regions: &["Finnmark", "Nordland"],
        dependencies: &["Bouvet Island"],
    },
    Country {
        name: "Iceland",
        code: "IS",
        cities: &[city("Reykjavik", 64.1466, -21.9426), city("Akureyri", 65.6885, -18.1262)],
        territories: &[],
        regions: &["Westfjords"],
        dependencies: &[],
    },
    Country {
        name: "Spain",
        code: "ES",
        cities: &[
            city("Madrid", 40.4168, -3.7038),
            city("Barcelona", 41.3874, 2.1686),
            city("Valencia", 39.4699, -0.3763),
            city("Seville", 37.3891, -5.9845),
        ],
        territories: &["Canary Islands", "Balearic Islands", "Ceuta", "Melilla"],
        regions: &["Andalusia", "Catalonia", "Galicia"],
        dependencies: &[],
    },
    Country {
        name: "Italy",
        code: "IT",
        cities: &[
            city("Rome", 41.9028, 12.4964),
            city("Milan", 45.4642, 9.1900),
            city("Naples", 40.8518, 14.2681),
        ],
        territories: &[],
        regions: &["Tuscany", "Sicily", "Sardinia", "Lombardy"],
        dependencies: &[],
    },
    Country {
        name: "Greece",
        code: "GR",
        cities: &[city("Athens", 37.9838, 23.7275), city("Thessaloniki", 40.6401, 22.9444)],
        territories: &[],
        regions: &["Crete", "Peloponnese"],
        dependencies: &[],
    },
    Country {
        name: "Portugal",
        code: "PT",
        cities: &[city("Lisbon", 38.7223, -9.1393), city("Porto", 41.1579, -8.6291)],
        territories: &["Azores", "Madeira"],
        regions: &["Algarve"],
        dependencies: &[],
    },
    Country {
        name: "Poland",
        code: "PL",
        cities: &[city("Warsaw", 52.2297, 21.0122), city("Krakow", 50.0647, 19.9450)],
        territories: &[],
        regions: &["Silesia", "Masovia"],
        dependencies: &[],
    },
    Country {
        name: "Ukraine",
        code: "UA",
        cities: &[city("Kyiv", 50.4501, 30.5234), city("Odesa", 46.4825, 30.7233)],
        territories: &[],
        regions: &["Crimea", "Galicia"],
        dependencies: &[],
    },
    Country {
        name: "Russia",
        code: "RU",
        cities: &[
            city("Moscow", 55.7558, 37.6173),
            city("Saint Petersburg", 59.9311, 30.3609),
            city("Murmansk", 68.9585, 33.0827),
            city("Norilsk", 69.3558, 88.1893),
        ],
        territories: &[],
        regions: &["Siberia", "Kamchatka", "Yakutia"],
        dependencies: &[],
    },
    Country {
        name: "Egypt",
        code: "EG",
        cities: &[city("Cairo", 30.0444, 31.2357), city("Alexandria", 31.2001, 29.9187)],
        territories: &[],
        regions: &["Sinai"],
        dependencies: &[],
    },
    Country {
        name: "Nigeria",
        code: "NG",
        cities: &[city("Lagos", 6.5244, 3.3792), city("Abuja", 9.0765, 7.3986)],
        territories: &[],
        regions: &["Kano"],
        dependencies: &[],
    },
    Country {
        name: "Kenya",
        code: "KE",
        cities: &[city("Nairobi", -1.2921, 36.8219), city("Mombasa", -4.0435, 39.6682)],
        territories: &[],
        regions: &["Rift Valley"],
        dependencies: &[],
    },
    Country {
        name: "South Africa",
        code: "ZA",
        cities: &[
            city("Cape Town", -33.9249, 18.4241),
            city("Johannesburg", -26.2041, 28.0473),
            city("Durban", -29.8587, 31.0218),
        ],
        territories: &[],
        regions: &["Western Cape", "Gauteng", "KwaZulu-Natal"],
        dependencies: &["Prince Edward Islands"],
    },
    Country {
        name: "Saudi Arabia",
        code: "SA",
        cities: &[
            city("Riyadh", 24.7136, 46.6753),
            city("Jeddah", 21.4858, 39.1925),
            city("Mecca", 21.4225, 39.8262),
        ],
        territories: &[],
        regions: &["Najd", "Hejaz"],
        dependencies: &[],
    },
    Country {
        name: "United Arab Emirates",
        code: "AE",
        cities: &[city("Dubai", 25.2048, 55.2708), city("Abu Dhabi", 24.4539, 54.3773)],
        territories: &[],
        regions: &["Sharjah"],
        dependencies: &[],
    },
    Country {
        name: "India",
        code: "IN",
        cities: &[
            city("Mumbai", 19.0760, 72.8777),
            city("Delhi", 28.7041, 77.1025),
            city("Bangalore", 12.9716, 77.5946),
            city("Chennai", 13.0827, 80.2707),
        ],
        territories: &["Andaman and Nicobar Islands", "Lakshadweep"],
        regions: &["Kerala", "Rajasthan", "Punjab"],
        dependencies: &[],
    },
    Country {
        name: "China",
        code: "CN",
        cities: &[
            city("Beijing", 39.9042, 116.4074),
            city("Shanghai", 31.2304, 121.4737),
            city("Harbin", 45.8038, 126.5350),
            city("Guangzhou", 23.1291, 113.2644),
        ],
        territories: &["Hong Kong", "Macau"],
        regions: &["Tibet", "Sichuan", "Yunnan"],
        dependencies: &[],
    },
    Country {
        name: "Japan",
        code: "JP",
        cities: &[
            city("Tokyo", 35.6762, 139.6503),
            city("Osaka", 34.6937, 135.5023),
            city("Sapporo", 43.0618, 141.3545),
        ],
        territories: &[],
        regions: &["Hokkaido", "Okinawa", "Kyushu"],
        dependencies: &[],
    },
    Country {
        name: "Singapore",
        code: "SG",
        cities: &[city("Singapore", 1.3521, 103.8198)],
        territories: &[],
        regions: &[],
        dependencies: &[],
    },
    Country {
        name: "Thailand",
        code: "TH",
        cities: &[city("Bangkok", 13.7563, 100.5018), city("Chiang Mai", 18.7883, 98.9853)],
        territories: &[],
        regions: &["Phuket"],
        dependencies: &[],
    },
    Country {
        name: "Indonesia",
        code: "ID",
        cities: &[city("Jakarta", -6.2088, 106.8456), city("Denpasar", -8.6705, 115.2126)],
        territories: &[],
        regions: &["Bali", "Java", "Sumatra"],
        dependencies: &[],
    },
    Country {
        name: "Australia",
        code: "AU",
        cities: &[
            city("Sydney", -33.8688, 151.2093),
            city("Melbourne", -37.8136, 144.9631),
            city("Perth", -31.9505, 115.8605),
            city("Brisbane", -27.4698, 153.0251),
            city("Darwin", -12.4634, 130.8456),
            city("Alice Springs", -23.6980, 133.8807),
        ],
        territories: &["Northern Territory", "Australian Capital Territory"],
        regions: &["Queensland", "Victoria", "Tasmania"],
        dependencies: &["Christmas Island", "Norfolk Island", "Cocos Islands"],
    },
    Country {
        name: "New Zealand",
        code: "NZ",
        cities: &[city("Auckland", -36.8485, 174.7633), city("Wellington", -41.2865, 174.7762)],
        territories: &[],
        regions: &["Canterbury", "Otago"],
        dependencies: &["Cook Islands", "Niue", "Tokelau"],
    },
];

/// Country centroids keyed by ISO 3166-1 alpha-2 code.
static CENTROIDS: &[(&str, f64, f64)] = &[
    ("AE", 23.4241, 53.8478),
    ("AR", -38.4161, -63.6167),
    ("AU", -25.2744, 133.7751),
    ("BR", -14.2350, -51.9253),
    ("CA", 56.1304, -106.3468),
    ("CN", 35.8617, 104.1954),
    ("DE", 51.1657, 10.4515),
    ("DK", 56.2639, 9.5018),
    ("EG", 26.8206, 30.8025),
    ("ES", 40.4637, -3.7492),
    ("FR", 46.2276, 2.2137),
    ("GB", 55.3781, -3.4360),
    ("GR", 39.0742, 21.8243),
    ("ID", -0.7893, 113.9213),
    ("IE", 53.4129, -8.2439),
    ("IN", 20.5937, 78.9629),
    ("IS", 64.9631, -19.0208),
    ("IT", 41.8719, 12.5674),
    ("JP", 36.2048, 138.2529),
    ("KE", -0.0236, 37.9062),
    ("MX", 23.6345, -102.5528),
    ("NG", 9.0820, 8.6753),
    ("NL", 52.1326, 5.2913),
    ("NO", 60.4720, 8.4689),
    ("NZ", -40.9006, 174.8860),
    ("PL", 51.9194, 19.1451),
    ("PT", 39.3999, -8.2245),
    ("RU", 61.5240, 105.3188),
    ("SA", 23.8859, 45.0792),
    ("SG", 1.3521, 103.8198),
    ("TH", 15.8700, 100.9925),
    ("UA", 48.3794, 31.1656),
    ("US", 37.0902, -95.7129),
    ("ZA", -30.5595, 22.9375),
];

/// Zone city lists, in the order `climate_zone_of` checks them.
static CLIMATE_ZONES: &[(ClimateZone, &[&str])] = &[
    (
        ClimateZone::Tropical,
        &[
            "Singapore", "Bangkok", "Manila", "Jakarta", "Kuala Lumpur", "Ho Chi Minh City",
            "Lagos", "Accra", "Miami", "Honolulu", "Rio de Janeiro", "Caracas", "Mumbai",
            "Colombo", "Panama City", "Havana", "Kinshasa", "Darwin", "Manaus", "Chennai",
        ],
    ),
    (
        ClimateZone::Desert,
        &[
            "Dubai", "Riyadh", "Cairo", "Phoenix", "Las Vegas", "Doha", "Kuwait City", "Muscat",
            "Tucson", "Alice Springs", "Timbuktu", "Khartoum", "Baghdad", "Abu Dhabi",
        ],
    ),
    (
        ClimateZone::Mediterranean,
        &[
            "Rome", "Athens", "Barcelona", "Lisbon", "Marseille", "Naples", "Tunis",
            "Los Angeles", "San Diego", "Perth", "Cape Town", "Valencia", "Seville",
        ],
    ),
    (
        ClimateZone::Continental,
        &[
            "Moscow", "Chicago", "Toronto", "Beijing", "Warsaw", "Kyiv", "Minneapolis",
            "Montreal", "Almaty", "Ulaanbaatar", "Harbin", "Krakow",
        ],
    ),
    (
        ClimateZone::Oceanic,
        &[
            "London", "Paris", "Dublin", "Amsterdam", "Brussels", "Seattle", "Vancouver",
            "Wellington", "Auckland", "Hamburg", "Copenhagen", "Bergen", "Edinburgh",
        ],
    ),
    (
        ClimateZone::Arctic,
        &[
            "Reykjavik", "Tromso", "Nuuk", "Longyearbyen", "Murmansk", "Norilsk", "Utqiagvik",
            "Iqaluit", "Yellowknife", "Fairbanks",
        ],
    ),
    (
        ClimateZone::Subtropical,
        &[
            "Shanghai", "Hong Kong", "Sydney", "Buenos Aires", "Houston", "New Orleans",
            "Atlanta", "Brisbane", "Taipei", "Sao Paulo", "Durban",
        ],
    ),
];

/// Continental summary points for the global temperature map: name, lat, lon
/// and a representative temperature in °C.
static CONTINENTAL_REGIONS: &[(&str, f64, f64, f64)] = &[
    ("North America", 54.5260, -105.2551, 12.0),
    ("South America", -8.7832, -55.4915, 24.0),
    ("Europe", 54.5260, 15.2551, 11.0),
    ("Africa", -8.7832, 34.5085, 27.0),
    ("Asia", 34.0479, 100.6197, 16.0),
    ("Oceania", -22.7359, 140.0188, 22.0),
    ("Antarctica", -82.8628, 135.0000, -49.0),
    ("Arctic", 84.0000, 0.0000, -25.0),
];

/// Every country, in table order.
pub fn countries() -> &'static [Country] {
    COUNTRIES
}

/// Centroid for an ISO country code, case-insensitive. Unknown codes map
/// to `(0, 0)`; callers treat that as "somewhere", not as an error.
pub fn centroid_of(country_code: &str) -> Coordinates {
    CENTROIDS
        .iter()
        .find(|(code, _, _)| code.eq_ignore_ascii_case(country_code))
        .map(|&(_, lat, lon)| Coordinates::new_unchecked(lat, lon))
        .unwrap_or_else(Coordinates::origin)
}

/// Climate zone for a place name.
///
/// Case-insensitive containment in either direction against each zone's
/// city list. Zones are checked in `CLIMATE_ZONES` order and the first hit
/// wins, so a short fragment such as "san" resolves to whichever list
/// mentions it first. Empty input is `Temperate`.
pub fn climate_zone_of(name: &str) -> ClimateZone {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return ClimateZone::Temperate;
    }

    for (zone, cities) in CLIMATE_ZONES {
        let hit = cities.iter().any(|city| {
            let city = city.to_lowercase();
            needle.contains(&city) || city.contains(&needle)
        });
        if hit {
            trace!(name, zone = %zone, "climate zone match");
            return *zone;
        }
    }

    ClimateZone::Temperate
}

/// Cities listed in the climate tables together with the country that
/// carries them in the registry, if any.
pub fn major_cities() -> Vec<(&'static str, Option<&'static Country>)> {
    CLIMATE_ZONES
        .iter()
        .flat_map(|(_, cities)| cities.iter().copied())
        .map(|name| {
            let country = COUNTRIES
                .iter()
                .find(|c| c.cities.iter().any(|city| city.name == name));
            (name, country)
        })
        .collect()
}

/// Continental summary points: `(name, coordinates, temperature °C)`.
pub fn continental_regions() -> Vec<(&'static str, Coordinates, f64)> {
    CONTINENTAL_REGIONS
        .iter()
        .map(|&(name, lat, lon, temp)| (name, Coordinates::new_unchecked(lat, lon), temp))
        .collect()
}

/// Case-insensitive substring search over every registry entry. Cities
/// carry their own coordinates; all other kinds use the country centroid.
pub fn search(query: &str, limit: usize) -> Vec<Location> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }
    let matches = |s: &str| s.to_lowercase().contains(&needle);

    let mut out = Vec::new();
    for country in COUNTRIES {
        if matches(country.name) || country.code.eq_ignore_ascii_case(&needle) {
            out.push(country.location(country.name, country.centroid(), LocationKind::Country));
        }
        for c in country.cities.iter().filter(|c| matches(c.name)) {
            out.push(country.location(c.name, c.coordinates(), LocationKind::City));
        }

        let named = [
            (country.territories, LocationKind::Territory),
            (country.regions, LocationKind::Region),
            (country.dependencies, LocationKind::Dependency),
        ];
        for (names, kind) in named {
            for name in names.iter().filter(|n| matches(n)) {
                out.push(country.location(name, country.centroid(), kind));
            }
        }

        if out.len() >= limit {
            break;
        }
    }

    out.truncate(limit);
    out
}
